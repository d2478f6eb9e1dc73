//! Error types.
//!
//! The physics step itself is infallible. Errors only surface when bodies are
//! built, when levels are loaded, and when the game layer rejects an action.

use thiserror::Error;

/// Precondition failures raised when a body is created.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BodyError {
    #[error("mass must be finite and greater than zero, got {0}")]
    InvalidMass(f32),
    #[error("{name} must be finite and greater than zero, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },
    #[error("restitution must lie in [0, 1], got {0}")]
    InvalidRestitution(f32),
    #[error("max speed must be finite and greater than zero, got {0}")]
    InvalidMaxSpeed(f32),
    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

/// Failures while loading or seeding a level layout.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level layout: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level has a non-positive cell size: {0}")]
    InvalidCellSize(f32),
    #[error("invalid level body: {0}")]
    Body(#[from] BodyError),
}

/// Actions rejected by the round state machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("unknown player {0:?}")]
    UnknownPlayer(String),
    #[error("player {0:?} already joined")]
    DuplicatePlayer(String),
    #[error("round is {actual}, expected {expected}")]
    WrongStatus {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("a round needs at least one granny and one runner")]
    NotEnoughPlayers,
    #[error("player {0:?} cannot do that as granny")]
    GrannyCannotHide(String),
    #[error("no free hiding spot within reach")]
    NoHidingSpotNearby,
    #[error("player {0:?} is out of the round")]
    PlayerOut(String),
    #[error("player {0:?} has no body in the physics world")]
    MissingBody(String),
    #[error(transparent)]
    Body(#[from] BodyError),
}

/// Failures exchanging player state with the shared room store.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("room store rejected the update: {0}")]
    Sink(String),
    #[error("cannot snapshot player: {0}")]
    Game(#[from] GameError),
}
