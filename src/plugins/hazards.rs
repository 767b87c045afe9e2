use crate::components::*;
use crate::game_logic::hazards::any_lane_hits;
use crate::level::LevelDefinition;
use crate::resources::GameState;
use bevy::prelude::*;

/// Moving traffic, checked every frame against the player's committed cell
pub struct HazardPlugin;

impl Plugin for HazardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (advance_traffic, sync_car_transforms, check_traffic_hits)
                .chain()
                .run_if(in_state(GameState::Playing))
                .run_if(resource_exists::<Traffic>),
        );
    }
}

fn advance_traffic(time: Res<Time>, mut traffic: ResMut<Traffic>) {
    let dt = time.delta_secs();
    for lane in &mut traffic.lanes {
        lane.advance(dt);
    }
}

fn sync_car_transforms(
    traffic: Res<Traffic>,
    level: Res<LevelDefinition>,
    mut cars: Query<(&CarVisual, &mut Transform)>,
) {
    for (car, mut transform) in &mut cars {
        let Some(lane) = traffic.lanes.get(car.lane) else {
            continue;
        };
        if let Some(footprint) = lane.car_footprints(level.cell_size).nth(car.car) {
            transform.translation.x = footprint.center_x;
            transform.translation.z = footprint.center_z;
        }
    }
}

fn check_traffic_hits(
    traffic: Res<Traffic>,
    level: Res<LevelDefinition>,
    mut players: Query<&mut Player>,
) {
    let Ok(mut player) = players.single_mut() else {
        return;
    };
    let cell = player.mover.grid_position();
    if !any_lane_hits(&traffic.lanes, cell, level.cell_size) {
        return;
    }

    let respawn = level.respawn_cell();
    info!("Hit by traffic at {cell}, respawning at {respawn}");
    if let Err(err) = player.mover.set_grid_position(respawn.x, respawn.z) {
        warn!("Respawn failed: {err}");
    }
}
