use crate::game_logic::intent::MoveIntent;
use bevy::prelude::*;
use std::collections::VecDeque;

/// Pending moves buffered between input events and the animation clock
pub const MOVE_QUEUE_CAPACITY: usize = 3;

/// Bounded FIFO of move intents. When full, new intents are dropped and the
/// ones already waiting keep their place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveQueue {
    pending: VecDeque<MoveIntent>,
}

impl MoveQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(MOVE_QUEUE_CAPACITY),
        }
    }

    /// Rebuild a queue from a saved list, keeping at most the first `MOVE_QUEUE_CAPACITY`
    pub fn from_intents(intents: &[MoveIntent]) -> Self {
        let mut queue = Self::new();
        for &intent in intents {
            queue.try_enqueue(intent);
        }
        queue
    }

    pub fn try_enqueue(&mut self, intent: MoveIntent) -> bool {
        if self.is_full() {
            debug!("Move queue full, dropping {intent}");
            return false;
        }
        self.pending.push_back(intent);
        true
    }

    pub fn dequeue(&mut self) -> Option<MoveIntent> {
        self.pending.pop_front()
    }

    pub fn peek(&self) -> Option<MoveIntent> {
        self.pending.front().copied()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pending.len() >= MOVE_QUEUE_CAPACITY
    }

    pub fn iter(&self) -> impl Iterator<Item = MoveIntent> + '_ {
        self.pending.iter().copied()
    }
}
