pub mod components;
pub mod config;
pub mod events;
pub mod game_logic;
pub mod level;
pub mod plugins;
pub mod resources;

// Selective re-exports for external consumers

// Plugins - main.rs needs all plugins
pub use plugins::*;

// Game logic - the levelcheck tool needs errors and the registry
pub use game_logic::errors::{GridhopError, GridhopResult};
pub use game_logic::{CollisionRegistry, GridCoord, GridMovementController, MoveIntent, Occupant};

// Level - tools need the level definition
pub use level::LevelDefinition;
