use crate::game_logic::grid::GridCoord;
use crate::game_logic::intent::MoveIntent;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// The single animation the controller is running. At most one is active.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    /// Legal one-cell move, committed when it finishes
    Hopping {
        start: Vec3,
        target: Vec3,
        target_cell: GridCoord,
        intent: MoveIntent,
        elapsed: f32,
        duration: f32,
    },
    /// Rejected move: out toward `origin + direction` and back, never commits
    Bumping {
        origin: Vec3,
        direction: Vec3,
        elapsed: f32,
        duration: f32,
    },
    /// Standing/lying transition; `progress` moves toward `target` (0 or 1)
    PoseBlending { progress: f32, target: f32 },
}

impl AnimationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AnimationState::Idle)
    }

    pub fn is_hopping(&self) -> bool {
        matches!(self, AnimationState::Hopping { .. })
    }

    pub fn is_bumping(&self) -> bool {
        matches!(self, AnimationState::Bumping { .. })
    }

    pub fn is_pose_blending(&self) -> bool {
        matches!(self, AnimationState::PoseBlending { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Hopping { .. } => "hopping",
            AnimationState::Bumping { .. } => "bumping",
            AnimationState::PoseBlending { .. } => "pose-blending",
        }
    }
}

/// Resting pose the character can blend into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pose {
    #[default]
    Standing,
    Lying,
}

impl Pose {
    pub fn progress_target(self) -> f32 {
        match self {
            Pose::Standing => 0.0,
            Pose::Lying => 1.0,
        }
    }
}
