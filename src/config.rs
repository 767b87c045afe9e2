pub mod range_types;

use crate::game_logic::errors::{GridhopError, GridhopResult};
use crate::resources::GameConfig;
use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("gridhop");
        fs::create_dir_all(&path).ok()?;
        path.push("config.toml");
        Some(path)
    })
}

/// Load the user config, falling back to defaults when missing or unreadable
pub fn load_config() -> GameConfig {
    let Some(config_path) = get_config_path() else {
        warn!("No config directory available, using default settings");
        return GameConfig::default();
    };

    match load_config_from(&config_path) {
        Ok(config) => {
            info!("Loaded config from {}", config_path.display());
            config
        }
        Err(GridhopError::Io(_)) => GameConfig::default(),
        Err(err) => {
            warn!("Ignoring config at {}: {err}", config_path.display());
            GameConfig::default()
        }
    }
}

pub fn load_config_from(path: &Path) -> GridhopResult<GameConfig> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str::<GameConfig>(&contents)?)
}

pub fn save_config(config: &GameConfig) -> GridhopResult<()> {
    let config_path = get_config_path().ok_or(GridhopError::ConfigDirNotFound)?;
    let contents = toml::to_string_pretty(config)?;
    fs::write(config_path, contents)?;
    Ok(())
}
