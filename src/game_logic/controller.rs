//! Grid movement state machine: move queue, hop/bump/pose animations and facing

use crate::game_logic::animation::{AnimationState, Pose};
use crate::game_logic::collision::CollisionRegistry;
use crate::game_logic::errors::{GridhopError, GridhopResult};
use crate::game_logic::grid::GridCoord;
use crate::game_logic::intent::MoveIntent;
use crate::game_logic::move_queue::MoveQueue;
use crate::game_logic::movement::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Notifications produced by [`GridMovementController::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementEvent {
    /// A hop finished and the grid position was committed
    MoveCompleted { cell: GridCoord, intent: MoveIntent },
    /// A move was rejected and a bump started
    Blocked {
        from: GridCoord,
        attempted: GridCoord,
        intent: MoveIntent,
    },
    /// A pose blend reached its endpoint
    PoseChanged { pose: Pose },
}

/// Owns the authoritative grid position of one character and everything needed
/// to animate it there.
///
/// `grid_position` only changes when a hop completes (or on teleport), so other
/// systems querying collisions mid-hop still see the old cell as occupied.
#[derive(Debug, Clone)]
pub struct GridMovementController {
    config: MovementConfig,
    grid_position: GridCoord,
    /// Horizontal animated position, before hop arc and pose offsets
    base_position: Vec3,
    hop_offset: f32,
    animation: AnimationState,
    pose: Pose,
    pose_progress: f32,
    yaw: f32,
    target_yaw: f32,
    queue: MoveQueue,
    locked: bool,
    events: Vec<MovementEvent>,
}

impl GridMovementController {
    /// Fails with `InvalidTeleportTarget` if `start` has no world transform
    pub fn new(start: GridCoord, config: MovementConfig) -> GridhopResult<Self> {
        ensure_placeable(start)?;
        Ok(Self {
            config,
            grid_position: start,
            base_position: start.to_world(config.cell_size),
            hop_offset: 0.0,
            animation: AnimationState::Idle,
            pose: Pose::Standing,
            pose_progress: 0.0,
            yaw: 0.0,
            target_yaw: 0.0,
            queue: MoveQueue::new(),
            locked: false,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Advance one frame: start the next animation if idle, advance the active
    /// animation, then turn toward the target facing. Negative or non-finite
    /// `dt` is treated as zero.
    pub fn update(&mut self, dt: f32, registry: &CollisionRegistry) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if self.animation.is_idle() {
            self.start_next_animation(registry);
        }
        self.advance_animation(dt);
        self.yaw = step_yaw(self.yaw, self.target_yaw, self.config.turn_rate * dt);
    }

    fn start_next_animation(&mut self, registry: &CollisionRegistry) {
        let pose_target = self.pose.progress_target();
        if self.pose_progress != pose_target {
            self.animation = AnimationState::PoseBlending {
                progress: self.pose_progress,
                target: pose_target,
            };
            return;
        }

        let Some(intent) = self.queue.peek() else {
            return;
        };

        // Get up first; the move stays queued until standing
        if self.pose == Pose::Lying {
            self.request_pose(Pose::Standing);
            self.animation = AnimationState::PoseBlending {
                progress: self.pose_progress,
                target: Pose::Standing.progress_target(),
            };
            return;
        }

        self.queue.dequeue();
        self.target_yaw = intent.facing_angle();

        let from = self.grid_position;
        let target_cell = from + intent.delta();
        if target_cell.has_world_transform() && registry.can_transition(from, target_cell) {
            self.animation = AnimationState::Hopping {
                start: self.base_position,
                target: target_cell.to_world(self.config.cell_size),
                target_cell,
                intent,
                elapsed: 0.0,
                duration: self.config.hop_duration,
            };
            debug!("Started {} from {from} to {target_cell}", self.animation.name());
        } else {
            debug!("Move {intent} from {from} into {target_cell} blocked");
            let delta = intent.delta();
            self.animation = AnimationState::Bumping {
                origin: self.base_position,
                direction: Vec3::new(delta.x as f32, 0.0, delta.z as f32)
                    * self.config.bump_distance,
                elapsed: 0.0,
                duration: self.config.bump_duration,
            };
            self.events.push(MovementEvent::Blocked {
                from,
                attempted: target_cell,
                intent,
            });
        }
    }

    fn advance_animation(&mut self, dt: f32) {
        self.animation = match self.animation {
            AnimationState::Idle => AnimationState::Idle,
            AnimationState::Hopping {
                start,
                target,
                target_cell,
                intent,
                elapsed,
                duration,
            } => {
                let elapsed = elapsed + dt;
                let t = progress(elapsed, duration);
                if t >= 1.0 {
                    self.grid_position = target_cell;
                    self.base_position = target;
                    self.hop_offset = 0.0;
                    self.events.push(MovementEvent::MoveCompleted {
                        cell: target_cell,
                        intent,
                    });
                    AnimationState::Idle
                } else {
                    self.base_position = start.lerp(target, smoothstep(t));
                    self.hop_offset = hop_arc(t, self.config.hop_height);
                    AnimationState::Hopping {
                        start,
                        target,
                        target_cell,
                        intent,
                        elapsed,
                        duration,
                    }
                }
            }
            AnimationState::Bumping {
                origin,
                direction,
                elapsed,
                duration,
            } => {
                let elapsed = elapsed + dt;
                let t = progress(elapsed, duration);
                if t >= 1.0 {
                    self.base_position = origin;
                    AnimationState::Idle
                } else {
                    self.base_position = origin + direction * bump_extent(t);
                    AnimationState::Bumping {
                        origin,
                        direction,
                        elapsed,
                        duration,
                    }
                }
            }
            AnimationState::PoseBlending { progress, target } => {
                let step = self.config.pose_blend_rate * dt;
                let progress = if (target - progress).abs() <= step {
                    target
                } else {
                    progress + step * (target - progress).signum()
                };
                self.pose_progress = progress;

                if progress == target {
                    let pose = if target > 0.5 { Pose::Lying } else { Pose::Standing };
                    info!("Pose blend finished: {pose:?}");
                    self.events.push(MovementEvent::PoseChanged { pose });
                    AnimationState::Idle
                } else {
                    AnimationState::PoseBlending { progress, target }
                }
            }
        };
    }

    /// Queue a move. Returns false if movement is locked or the queue is full.
    pub fn queue_move(&mut self, intent: MoveIntent) -> bool {
        if self.locked {
            debug!("Movement locked, ignoring {intent}");
            return false;
        }
        self.queue.try_enqueue(intent)
    }

    /// Ask for a resting pose. The blend starts once the current hop or bump ends;
    /// a blend already running is redirected toward the new pose.
    pub fn request_pose(&mut self, pose: Pose) {
        self.pose = pose;
        if let AnimationState::PoseBlending { target, .. } = &mut self.animation {
            *target = pose.progress_target();
        }
    }

    /// Hard teleport: drops queued moves and any running animation, and places
    /// the character exactly on `(x, z)`. Calling it twice is the same as once.
    pub fn set_grid_position(&mut self, x: i32, z: i32) -> GridhopResult<()> {
        let cell = GridCoord::new(x, z);
        ensure_placeable(cell)?;

        self.queue.clear();
        self.animation = AnimationState::Idle;
        self.grid_position = cell;
        self.base_position = cell.to_world(self.config.cell_size);
        self.hop_offset = 0.0;
        self.pose_progress = self.pose.progress_target();
        info!("Teleported to {cell}");
        Ok(())
    }

    /// While locked, new moves are rejected. Locking also drops queued moves;
    /// a hop already in flight still lands.
    pub fn lock_movement(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.queue.clear();
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn grid_position(&self) -> GridCoord {
        self.grid_position
    }

    /// Smoothed position for cameras and rendering
    pub fn visual_position(&self) -> Vec3 {
        self.base_position
            + Vec3::Y * self.hop_offset
            + pose_offset(self.pose_progress, &self.config)
    }

    /// Facing yaw combined with the pose pitch
    pub fn visual_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
            * Quat::from_rotation_x(pose_pitch(self.pose_progress, &self.config))
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn target_yaw(&self) -> f32 {
        self.target_yaw
    }

    pub fn is_moving(&self) -> bool {
        self.animation.is_hopping()
    }

    pub fn is_bumping(&self) -> bool {
        self.animation.is_bumping()
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn pose_progress(&self) -> f32 {
        self.pose_progress
    }

    pub fn queued_moves(&self) -> usize {
        self.queue.len()
    }

    /// Take every notification produced since the last call
    pub fn drain_events(&mut self) -> Vec<MovementEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            grid_position: self.grid_position,
            base_position: self.base_position,
            hop_offset: self.hop_offset,
            animation: self.animation,
            pose: self.pose,
            pose_progress: self.pose_progress,
            yaw: self.yaw,
            target_yaw: self.target_yaw,
            queue: self.queue.iter().collect(),
            locked: self.locked,
        }
    }

    /// Rebuild a controller from a snapshot, rejecting cells with no world transform
    pub fn restore(snapshot: &ControllerSnapshot, config: MovementConfig) -> GridhopResult<Self> {
        ensure_placeable(snapshot.grid_position)?;
        if let AnimationState::Hopping { target_cell, .. } = snapshot.animation {
            ensure_placeable(target_cell)?;
        }
        Ok(Self {
            config,
            grid_position: snapshot.grid_position,
            base_position: snapshot.base_position,
            hop_offset: snapshot.hop_offset,
            animation: snapshot.animation,
            pose: snapshot.pose,
            pose_progress: snapshot.pose_progress.clamp(0.0, 1.0),
            yaw: snapshot.yaw,
            target_yaw: snapshot.target_yaw,
            queue: MoveQueue::from_intents(&snapshot.queue),
            locked: snapshot.locked,
            events: Vec::new(),
        })
    }
}

fn ensure_placeable(cell: GridCoord) -> GridhopResult<()> {
    if cell.has_world_transform() {
        Ok(())
    } else {
        Err(GridhopError::InvalidTeleportTarget {
            x: cell.x,
            z: cell.z,
        })
    }
}

/// Complete inspectable state of a controller at a frame boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub grid_position: GridCoord,
    pub base_position: Vec3,
    pub hop_offset: f32,
    pub animation: AnimationState,
    pub pose: Pose,
    pub pose_progress: f32,
    pub yaw: f32,
    pub target_yaw: f32,
    pub queue: Vec<MoveIntent>,
    pub locked: bool,
}

impl ControllerSnapshot {
    pub fn to_bytes(&self) -> GridhopResult<Vec<u8>> {
        bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(|e| {
            GridhopError::SnapshotFailed {
                reason: format!("Failed to encode snapshot: {e}"),
            }
        })
    }

    pub fn from_bytes(data: &[u8]) -> GridhopResult<Self> {
        let (snapshot, _): (ControllerSnapshot, usize) =
            bincode::serde::decode_from_slice(data, bincode::config::standard()).map_err(|e| {
                GridhopError::SnapshotFailed {
                    reason: format!("Failed to decode snapshot: {e}"),
                }
            })?;
        Ok(snapshot)
    }
}
