//! Exchange of player state with the shared room store.
//!
//! The local peer publishes its own player at a throttled rate through a
//! [`RoomStateSink`]. Snapshots about other peers are queued in a
//! [`RemoteStateBuffer`] and written into the world between ticks.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{GameError, SyncError};
use crate::game::Round;
use crate::physics::PhysicsWorld;

/// Wire form of one player's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub is_granny: bool,
    pub is_hiding: bool,
    #[serde(default)]
    pub hiding_spot: Option<usize>,
    #[serde(default)]
    pub caught: bool,
}

impl PlayerSnapshot {
    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Destination for published snapshots.
pub trait RoomStateSink {
    fn publish(&mut self, snapshot: &PlayerSnapshot) -> Result<(), SyncError>;
}

impl RoomStateSink for Vec<PlayerSnapshot> {
    fn publish(&mut self, snapshot: &PlayerSnapshot) -> Result<(), SyncError> {
        self.push(snapshot.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLines<W> {
    writer: W,
}

impl<W: Write> JsonLines<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RoomStateSink for JsonLines<W> {
    fn publish(&mut self, snapshot: &PlayerSnapshot) -> Result<(), SyncError> {
        serde_json::to_writer(&mut self.writer, snapshot)?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| SyncError::Sink(e.to_string()))
    }
}

/// Throttles publishing of the local player.
#[derive(Debug, Clone)]
pub struct PositionPublisher {
    player: String,
    interval: f32,
    since_last: f32,
    /// Hiding flag carried by the last published snapshot.
    last_hiding: Option<bool>,
}

impl PositionPublisher {
    /// The first call to [`update`](Self::update) publishes immediately.
    pub fn new(player: impl Into<String>, interval: f32) -> Self {
        Self {
            player: player.into(),
            interval,
            since_last: interval,
            last_hiding: None,
        }
    }

    /// Publish when at least one interval has passed since the last publish.
    ///
    /// Hiding or leaving a spot is published at once, ignoring the interval.
    /// Between those changes nothing is sent while the player hides, so other
    /// peers keep the last position seen. Returns whether a snapshot was sent.
    pub fn update<S: RoomStateSink>(
        &mut self,
        round: &Round,
        world: &PhysicsWorld,
        elapsed: f32,
        sink: &mut S,
    ) -> Result<bool, SyncError> {
        self.since_last += elapsed;

        let player = round
            .player(&self.player)
            .ok_or_else(|| GameError::UnknownPlayer(self.player.clone()))?;
        let changed = self.last_hiding != Some(player.hiding);
        if !changed && (player.hiding || self.since_last < self.interval) {
            return Ok(false);
        }

        let snapshot = round.snapshot(world, &self.player)?;
        sink.publish(&snapshot)?;
        if changed {
            debug!(player = %self.player, hiding = snapshot.is_hiding, "hiding state published");
        }
        trace!(player = %self.player, x = snapshot.x, y = snapshot.y, "position published");
        self.last_hiding = Some(snapshot.is_hiding);
        self.since_last = 0.0;
        Ok(true)
    }
}

/// Latest pending snapshot per remote player.
#[derive(Debug, Clone, Default)]
pub struct RemoteStateBuffer {
    pending: BTreeMap<String, PlayerSnapshot>,
}

impl RemoteStateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a snapshot. A newer one for the same player replaces it.
    pub fn push(&mut self, snapshot: PlayerSnapshot) {
        self.pending.insert(snapshot.id.clone(), snapshot);
    }

    pub fn push_json(&mut self, json: &str) -> Result<(), SyncError> {
        self.push(PlayerSnapshot::from_json(json)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Write every queued snapshot into the world and round.
    ///
    /// Snapshots about local or unknown players are dropped. Returns how many
    /// were applied.
    pub fn apply(&mut self, world: &mut PhysicsWorld, round: &mut Round) -> usize {
        let mut applied = 0;
        for (id, snapshot) in std::mem::take(&mut self.pending) {
            match round.apply_snapshot(world, &snapshot) {
                Ok(true) => applied += 1,
                Ok(false) => trace!(player = %id, "ignoring snapshot for local player"),
                Err(err) => debug!(player = %id, %err, "dropping snapshot"),
            }
        }
        applied
    }
}
