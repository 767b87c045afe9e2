pub mod animation;
pub mod collision;
pub mod controller;
pub mod errors;
pub mod grid;
pub mod hazards;
pub mod intent;
pub mod move_queue;
pub mod movement;

pub use animation::*;
pub use collision::*;
pub use controller::*;
pub use errors::*;
pub use grid::*;
pub use intent::*;
pub use move_queue::*;
pub use movement::*;
