use crate::config::range_types::*;
use crate::game_logic::movement::MovementConfig;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct GameConfig {
    pub settings: GameSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
// NOTE: When adding new fields, update the default config.toml example in the project root
pub struct GameSettings {
    // Movement settings
    pub hop_duration: AnimationDuration,
    pub hop_height: HopHeight,
    pub bump_duration: AnimationDuration,
    pub bump_distance: BumpDistance,
    pub turn_rate: TurnRate,
    pub pose_blend_rate: BlendRate,

    // Camera settings
    pub camera_offset: [f32; 3],
    pub camera_smoothing: f32,

    // UI settings
    pub window_width: f32,
    pub window_height: f32,

    // Visual settings
    pub ambient_light_brightness: f32,
    pub player_color: [f32; 3],
    pub wall_color: [f32; 3],
    pub interactable_color: [f32; 3],
    pub car_color: [f32; 3],

    // Level settings
    pub level_file_path: String, // Path to level file relative to the levels directory
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            // Movement settings
            hop_duration: AnimationDuration::new(0.18),
            hop_height: HopHeight::new(0.6),
            bump_duration: AnimationDuration::new(0.16),
            bump_distance: BumpDistance::new(0.35),
            turn_rate: TurnRate::new(14.0),
            pose_blend_rate: BlendRate::new(2.5),

            // Camera settings
            camera_offset: [0.0, 14.0, 10.0],
            camera_smoothing: 8.0,

            // UI settings
            window_width: 1280.0,
            window_height: 720.0,

            // Visual settings
            ambient_light_brightness: 300.0,
            player_color: [0.95, 0.75, 0.3],
            wall_color: [0.35, 0.35, 0.45],
            interactable_color: [0.3, 0.7, 0.5],
            car_color: [0.8, 0.2, 0.2],

            // Level settings
            level_file_path: "bedroom.toml".to_string(),
        }
    }
}

impl GameSettings {
    /// Movement tuning for the grid controller
    pub fn movement_config(&self) -> MovementConfig {
        MovementConfig {
            hop_duration: self.hop_duration.get(),
            hop_height: self.hop_height.get(),
            bump_duration: self.bump_duration.get(),
            bump_distance: self.bump_distance.get(),
            turn_rate: self.turn_rate.get(),
            pose_blend_rate: self.pose_blend_rate.get(),
            ..MovementConfig::default()
        }
    }
}

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_movement_defaults() {
        let from_settings = GameSettings::default().movement_config();
        assert_eq!(from_settings, MovementConfig::default());
    }

    #[test]
    fn test_movement_config_uses_clamped_values() {
        let settings = GameSettings {
            bump_distance: BumpDistance::new(10.0),
            ..GameSettings::default()
        };
        assert_eq!(settings.movement_config().bump_distance, 0.9);
    }

    #[test]
    fn test_nan_settings_fall_back_to_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            [settings]
            hop_duration = nan
            pose_blend_rate = nan
            "#,
        )
        .unwrap();
        let movement = config.settings.movement_config();
        assert_eq!(movement.hop_duration, 0.18);
        assert_eq!(movement.pose_blend_rate, 2.5);
    }
}
