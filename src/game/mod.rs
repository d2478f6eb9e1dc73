//! Hide-and-seek rules on top of the physics world.

pub mod config;
pub mod level;
pub mod round;

pub use config::GameConfig;
pub use level::{ItemKind, Level, LevelBodies};
pub use round::{EndReason, Role, Round, RoundEvent, RoundStatus};
