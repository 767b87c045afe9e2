use bevy::prelude::*;
use gridhop::config::load_config;
use gridhop::events::add_gridhop_events;
use gridhop::plugins::*;
use gridhop::resources::GameState;

fn main() {
    let game_config = load_config();
    let settings = &game_config.settings;

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "gridhop".into(),
            resolution: (settings.window_width, settings.window_height).into(),
            ..default()
        }),
        ..default()
    }))
    .init_state::<GameState>()
    .insert_resource(game_config.clone());
    add_gridhop_events(&mut app);

    app.add_plugins((
        LevelPlugin,
        PlayerPlugin,
        CameraPlugin,
        HazardPlugin,
        TriggerPlugin,
    ))
    .run();
}
