//! Round tunables.

use serde::{Deserialize, Serialize};

/// Gameplay constants for one round.
///
/// Speeds are world units per physics tick at `delta_time = 1`. Durations are
/// in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Runner body radius. Default: 15.
    pub player_size: f32,
    /// Granny body radius. Default: 20.
    pub granny_size: f32,
    /// Runner walking speed. Default: 3.
    pub player_speed: f32,
    /// Granny walking speed. Default: 2.5.
    pub granny_speed: f32,
    /// Speed multiplier while sprinting. Default: 1.5.
    pub sprint_multiplier: f32,
    /// Max center distance from a runner to a hiding spot. Default: 40.
    pub hide_distance: f32,
    /// Max gap between granny and runner surfaces for a catch. Default: 25.
    pub catch_distance: f32,
    /// Max center distance from a runner to an exit. Default: 25.
    pub escape_distance: f32,
    /// Max center distance from a player to an item it picks up. Default: 20.
    pub pickup_distance: f32,
    /// Round length. Default: 120.
    pub round_time: f32,
    /// Minimum time between two position publishes. Default: 0.1.
    pub publish_interval: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_size: 15.0,
            granny_size: 20.0,
            player_speed: 3.0,
            granny_speed: 2.5,
            sprint_multiplier: 1.5,
            hide_distance: 40.0,
            catch_distance: 25.0,
            escape_distance: 25.0,
            pickup_distance: 20.0,
            round_time: 120.0,
            publish_interval: 0.1,
        }
    }
}
