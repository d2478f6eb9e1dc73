//! Granny hide-and-seek simulation core
//!
//! A small 2D physics engine plus the round rules of a multiplayer
//! hide-and-seek game, and the state exchange between peers.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **physics** - Circle and rectangle bodies, collision detection and
//!    response, segment casts and line of sight
//! 2. **game** - Level layout, round state machine (hiding, catching, escaping)
//! 3. **sync** - Player snapshots, throttled publishing, remote state buffering
//! 4. **error** - Error types for body creation, levels, rounds and sync
//!
//! A host drives one tick as:
//!
//! ```ignore
//! remote.apply(&mut world, &mut round);
//! round.steer(&mut world, "me", input, sprint)?;
//! world.update(1.0);
//! let events = round.tick(&mut world, elapsed);
//! publisher.update(&round, &world, elapsed, &mut sink)?;
//! ```

pub mod error;
pub mod game;
pub mod physics;
pub mod sync;

// Re-export commonly used types
pub use error::{BodyError, GameError, LevelError, SyncError};

pub use physics::body::{Body, BodyKind, BodyType, Mass, Shape};
pub use physics::body_set::{BodyHandle, BodySet};
pub use physics::contact::Contact;
pub use physics::factory::{BodyFactory, BodyOverrides};
pub use physics::raycast::RayHit;
pub use physics::{PhysicsConfig, PhysicsWorld};

pub use game::{
    EndReason, GameConfig, ItemKind, Level, LevelBodies, Role, Round, RoundEvent, RoundStatus,
};

pub use sync::{JsonLines, PlayerSnapshot, PositionPublisher, RemoteStateBuffer, RoomStateSink};

// Re-export glam for convenience
pub use glam;
