pub mod camera;
pub mod hazards;
pub mod level;
pub mod player;
pub mod triggers;

pub use camera::*;
pub use hazards::*;
pub use level::*;
pub use player::*;
pub use triggers::*;
