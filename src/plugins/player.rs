use crate::components::*;
use crate::events::*;
use crate::game_logic::collision::CollisionRegistry;
use crate::game_logic::controller::{GridMovementController, MovementEvent};
use crate::game_logic::intent::MoveIntent;
use crate::level::LevelDefinition;
use crate::plugins::level::{load_level, rgb};
use crate::resources::{GameConfig, GameState};
use bevy::prelude::*;

/// Height of the capsule's center above the floor
const PLAYER_HALF_HEIGHT: f32 = 0.8;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_player.after(load_level))
            .add_systems(
                Update,
                (
                    handle_player_input,
                    apply_movement_lock,
                    drive_player,
                    sync_player_transform,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Keyboard mapping for the four move intents
pub fn intent_for_key(key: KeyCode) -> Option<MoveIntent> {
    match key {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(MoveIntent::Forward),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(MoveIntent::Backward),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(MoveIntent::Left),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(MoveIntent::Right),
        _ => None,
    }
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    game_config: Res<GameConfig>,
    level: Res<LevelDefinition>,
) {
    let mut config = game_config.settings.movement_config();
    config.cell_size = level.cell_size;
    let mover = match GridMovementController::new(level.spawn_cell(), config) {
        Ok(mover) => mover,
        Err(err) => {
            error!("Cannot spawn player: {err}");
            return;
        }
    };

    info!("Spawning player at {}", level.spawn_cell());
    commands.spawn((
        Mesh3d(meshes.add(Capsule3d::new(0.4, 0.8))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: rgb(game_config.settings.player_color),
            ..default()
        })),
        Transform::from_translation(mover.visual_position() + Vec3::Y * PLAYER_HALF_HEIGHT),
        Player { mover },
        LevelEntity,
    ));
}

fn handle_player_input(keys: Res<ButtonInput<KeyCode>>, mut players: Query<&mut Player>) {
    let Ok(mut player) = players.single_mut() else {
        return;
    };
    for intent in keys.get_just_pressed().filter_map(|key| intent_for_key(*key)) {
        player.mover.queue_move(intent);
    }
}

fn apply_movement_lock(mut locks: EventReader<SetMovementLock>, mut players: Query<&mut Player>) {
    let Ok(mut player) = players.single_mut() else {
        return;
    };
    for lock in locks.read() {
        if player.mover.is_locked() != lock.locked {
            debug!("Movement lock: {}", lock.locked);
        }
        player.mover.lock_movement(lock.locked);
    }
}

pub fn drive_player(
    time: Res<Time>,
    registry: Res<CollisionRegistry>,
    mut players: Query<&mut Player>,
    mut completed: EventWriter<MoveCompleted>,
    mut blocked: EventWriter<MoveBlocked>,
    mut poses: EventWriter<PoseChanged>,
) {
    let Ok(mut player) = players.single_mut() else {
        return;
    };
    player.mover.update(time.delta_secs(), &registry);

    for event in player.mover.drain_events() {
        match event {
            MovementEvent::MoveCompleted { cell, intent } => {
                completed.write(MoveCompleted { cell, intent });
            }
            MovementEvent::Blocked {
                from,
                attempted,
                intent,
            } => {
                blocked.write(MoveBlocked {
                    from,
                    attempted,
                    intent,
                });
            }
            MovementEvent::PoseChanged { pose } => {
                poses.write(PoseChanged { pose });
            }
        }
    }
}

fn sync_player_transform(mut players: Query<(&Player, &mut Transform)>) {
    for (player, mut transform) in &mut players {
        transform.translation = player.mover.visual_position() + Vec3::Y * PLAYER_HALF_HEIGHT;
        transform.rotation = player.mover.visual_rotation();
    }
}
