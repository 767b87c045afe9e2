//! Bevy events connecting the movement controller to the rest of the game

use crate::game_logic::animation::Pose;
use crate::game_logic::grid::GridCoord;
use crate::game_logic::intent::MoveIntent;
use bevy::prelude::*;

/// The player finished a hop and now stands on `cell`
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MoveCompleted {
    pub cell: GridCoord,
    pub intent: MoveIntent,
}

/// A requested move ran into a static cell
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MoveBlocked {
    pub from: GridCoord,
    pub attempted: GridCoord,
    pub intent: MoveIntent,
}

/// The player finished blending into a resting pose
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PoseChanged {
    pub pose: Pose,
}

/// An interactable is on or next to the player's cell
#[derive(Event, Debug, Clone, PartialEq)]
pub struct InteractionAvailable {
    pub cell: GridCoord,
    pub payload: String,
}

/// Suspend or restore player control (scripted sequences)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SetMovementLock {
    pub locked: bool,
}

/// Register every gridhop event with the app
pub fn add_gridhop_events(app: &mut App) {
    app.add_event::<MoveCompleted>()
        .add_event::<MoveBlocked>()
        .add_event::<PoseChanged>()
        .add_event::<InteractionAvailable>()
        .add_event::<SetMovementLock>();
}
