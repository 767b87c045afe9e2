use crate::components::*;
use crate::resources::{GameConfig, GameState};
use bevy::prelude::*;
use bevy::transform::TransformSystem;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera_and_light).add_systems(
            PostUpdate,
            follow_camera
                .before(TransformSystem::TransformPropagate)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

fn setup_camera_and_light(mut commands: Commands, game_config: Res<GameConfig>) {
    let settings = &game_config.settings;

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform {
            translation: Vec3::new(0.0, 10.0, 0.0),
            rotation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_3),
            ..default()
        },
        SceneLight,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: settings.ambient_light_brightness,
        affects_lightmapped_meshes: false,
    });

    let offset = Vec3::from_array(settings.camera_offset);
    info!("Spawning camera with offset {offset}");
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(offset).looking_at(Vec3::ZERO, Vec3::Y),
        CameraFollow {
            offset,
            smoothing: settings.camera_smoothing,
        },
    ));
}

/// Exponential approach factor for one frame
pub fn follow_factor(smoothing: f32, dt: f32) -> f32 {
    1.0 - (-smoothing.max(0.0) * dt.max(0.0)).exp()
}

fn follow_camera(
    time: Res<Time>,
    player_query: Query<&Player>,
    mut camera_query: Query<(&mut Transform, &CameraFollow)>,
) {
    // Follow the animated position, never the raw grid cell, so the camera glides mid-hop
    let Ok(player) = player_query.single() else {
        return;
    };
    let focus = player.mover.visual_position();

    for (mut camera_transform, follow) in &mut camera_query {
        let goal = focus + follow.offset;
        let t = follow_factor(follow.smoothing, time.delta_secs());
        camera_transform.translation = camera_transform.translation.lerp(goal, t);
        camera_transform.look_at(focus, Vec3::Y);
    }
}
