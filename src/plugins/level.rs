use crate::components::*;
use crate::game_logic::collision::CollisionRegistry;
use crate::game_logic::errors::GridhopResult;
use crate::game_logic::hazards::TrafficLane;
use crate::level::{LevelDefinition, ObjectKind};
use crate::resources::{GameConfig, GameState};
use bevy::prelude::*;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), finish_loading)
            .add_systems(OnEnter(GameState::Playing), load_level)
            .add_systems(OnExit(GameState::Playing), unload_level)
            .add_systems(Update, reload_level.run_if(in_state(GameState::Playing)));
    }
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Playing);
}

fn reload_level(keys: Res<ButtonInput<KeyCode>>, mut next_state: ResMut<NextState<GameState>>) {
    if keys.just_pressed(KeyCode::F5) {
        info!("Reloading level");
        next_state.set(GameState::Loading);
    }
}

/// Read the configured level, or the built-in fallback room if that fails
pub fn resolve_level(game_config: &GameConfig) -> LevelDefinition {
    match load_level_from_config(game_config) {
        Ok(level) => level,
        Err(err) => {
            error!("Failed to load level: {err}");
            warn!("Falling back to the built-in room");
            LevelDefinition::fallback()
        }
    }
}

fn load_level_from_config(game_config: &GameConfig) -> GridhopResult<LevelDefinition> {
    LevelDefinition::load_from_file(&game_config.settings.level_file_path)
}

pub fn load_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    game_config: Res<GameConfig>,
) {
    let level = resolve_level(&game_config);
    let settings = &game_config.settings;

    let mut registry = CollisionRegistry::new(level.cell_size);
    let stats = level.populate_registry(&mut registry);
    info!(
        "Loaded level '{name}': {statics} static, {interactables} interactable, {border} boundary cells",
        name = level.name,
        statics = stats.static_cells,
        interactables = stats.interactable_cells,
        border = stats.boundary_cells,
    );
    if stats.conflicts > 0 {
        warn!("Level '{}' has {} conflicting registrations", level.name, stats.conflicts);
    }

    // Floor under the walkable area
    let floor_size = level
        .bounds
        .map(|b| {
            Vec2::new(
                (b.max[0] - b.min[0] + 1) as f32,
                (b.max[1] - b.min[1] + 1) as f32,
            ) * level.cell_size
        })
        .unwrap_or(Vec2::splat(40.0 * level.cell_size));
    let floor_center = level
        .bounds
        .map(|b| {
            Vec3::new(
                (b.min[0] + b.max[0]) as f32 * 0.5,
                0.0,
                (b.min[1] + b.max[1]) as f32 * 0.5,
            ) * level.cell_size
        })
        .unwrap_or(Vec3::ZERO);
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(floor_size.x, floor_size.y))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.55, 0.5, 0.45),
            ..default()
        })),
        Transform::from_translation(floor_center),
        LevelEntity,
    ));

    let wall_material = materials.add(StandardMaterial {
        base_color: rgb(settings.wall_color),
        ..default()
    });
    let interactable_material = materials.add(StandardMaterial {
        base_color: rgb(settings.interactable_color),
        ..default()
    });

    for object in &level.objects {
        let material = match object.kind {
            ObjectKind::Static => wall_material.clone(),
            ObjectKind::Interactable => interactable_material.clone(),
        };
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(object.size[0], object.height, object.size[1]))),
            MeshMaterial3d(material),
            Transform::from_xyz(object.position[0], object.height / 2.0, object.position[1]),
            LevelEntity,
        ));
    }

    // Traffic lanes and their car visuals
    let mut rng = rand::thread_rng();
    let lanes: Vec<TrafficLane> = level
        .traffic
        .iter()
        .map(|spec| TrafficLane::new(*spec, &mut rng))
        .collect();
    let car_material = materials.add(StandardMaterial {
        base_color: rgb(settings.car_color),
        ..default()
    });
    for (lane_index, lane) in lanes.iter().enumerate() {
        let car_mesh = meshes.add(Cuboid::new(lane.spec.car_length, 1.0, lane.spec.car_width));
        for (car_index, footprint) in lane.car_footprints(level.cell_size).enumerate() {
            commands.spawn((
                Mesh3d(car_mesh.clone()),
                MeshMaterial3d(car_material.clone()),
                Transform::from_xyz(footprint.center_x, 0.5, footprint.center_z),
                CarVisual {
                    lane: lane_index,
                    car: car_index,
                },
                LevelEntity,
            ));
        }
    }

    commands.insert_resource(Traffic { lanes });
    commands.insert_resource(registry);
    commands.insert_resource(level);
}

fn unload_level(
    mut commands: Commands,
    mut registry: ResMut<CollisionRegistry>,
    level_entities: Query<Entity, With<LevelEntity>>,
) {
    registry.clear();
    for entity in &level_entities {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<Traffic>();
    commands.remove_resource::<LevelDefinition>();
    info!("Level unloaded");
}

pub fn rgb(color: [f32; 3]) -> Color {
    Color::srgb(color[0], color[1], color[2])
}
