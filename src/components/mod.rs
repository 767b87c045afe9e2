use crate::game_logic::controller::GridMovementController;
use crate::game_logic::hazards::TrafficLane;
use bevy::prelude::*;

/// The player character; owns its grid movement state
#[derive(Component)]
pub struct Player {
    pub mover: GridMovementController,
}

/// Anything spawned for the current level, despawned on unload
#[derive(Component)]
pub struct LevelEntity;

#[derive(Component)]
pub struct SceneLight;

#[derive(Component)]
pub struct CameraFollow {
    pub offset: Vec3,
    /// Exponential smoothing rate; higher follows more tightly
    pub smoothing: f32,
}

/// Visual for one car: index into [`Traffic::lanes`] and into that lane's cars
#[derive(Component)]
pub struct CarVisual {
    pub lane: usize,
    pub car: usize,
}

/// Moving hazards of the current level
#[derive(Resource, Default)]
pub struct Traffic {
    pub lanes: Vec<TrafficLane>,
}

/// A timed scripted beat during which player movement is locked
#[derive(Resource, Default)]
pub struct ScriptedPause {
    pub timer: Option<Timer>,
}
