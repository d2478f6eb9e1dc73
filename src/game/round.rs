//! Round state machine: lobby, play, catches, hiding, escapes and the end.

use std::collections::BTreeMap;

use glam::Vec2;
use tracing::{debug, info, warn};

use crate::error::GameError;
use crate::physics::body::Body;
use crate::physics::body_set::BodyHandle;
use crate::physics::factory::{BodyFactory, BodyOverrides};
use crate::physics::geometry::{self, Aabb};
use crate::physics::PhysicsWorld;
use crate::sync::PlayerSnapshot;

use super::config::GameConfig;
use super::level::{ExitPoint, ItemKind, LevelBodies};

/// Gap left between a player leaving a hiding spot and the spot's edge.
const SPOT_EXIT_CLEARANCE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Granny,
    Runner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every runner was caught.
    GrannyWin,
    /// No runner is left in the house and at least one got out.
    RunnersEscaped,
    /// The clock ran out with runners still free.
    Timeout,
    /// Every granny or every runner left mid-round.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Waiting,
    Playing,
    Ended(EndReason),
}

impl RoundStatus {
    fn name(self) -> &'static str {
        match self {
            RoundStatus::Waiting => "waiting",
            RoundStatus::Playing => "playing",
            RoundStatus::Ended(_) => "ended",
        }
    }
}

/// Things that happened during one [`Round::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    Caught { runner: String, granny: String },
    Escaped { runner: String },
    /// `item` indexes [`Round::items`].
    PickedUp { player: String, item: usize, kind: ItemKind },
    Ended(EndReason),
}

/// One participant.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Driven by snapshots from another peer instead of local input.
    pub remote: bool,
    pub hiding: bool,
    /// Level object index of the occupied spot.
    pub hiding_spot: Option<usize>,
    pub caught: bool,
    pub escaped: bool,
    pub sprinting: bool,
    pub inventory: Vec<ItemKind>,
    radius: f32,
    body: Option<BodyHandle>,
    /// Body taken out of the world while hidden, caught or escaped.
    parked: Option<Body>,
    /// Where the player stood before hiding.
    entered_from: Option<Vec2>,
}

impl PlayerState {
    /// Handle of the body while it is in the world.
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Still in the house and not caught.
    pub fn is_free(&self) -> bool {
        !self.caught && !self.escaped
    }

    pub fn has_item(&self, kind: ItemKind) -> bool {
        self.inventory.contains(&kind)
    }

    /// Current position, whether the body is live or parked.
    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        match self.body {
            Some(handle) => world.body(handle).map(|b| b.position),
            None => self.parked.as_ref().map(|b| b.position),
        }
    }

    fn velocity(&self, world: &PhysicsWorld) -> Vec2 {
        self.body
            .and_then(|h| world.body(h))
            .map_or(Vec2::ZERO, |b| b.velocity)
    }

    fn park(&mut self, world: &mut PhysicsWorld) {
        if let Some(handle) = self.body.take() {
            self.parked = world.remove_body(handle);
        }
    }

    fn unpark(&mut self, world: &mut PhysicsWorld, position: Vec2) {
        if let Some(mut body) = self.parked.take() {
            body.position = position;
            body.velocity = Vec2::ZERO;
            self.body = Some(world.add_body(body));
        }
    }
}

/// A hideable object and whoever is inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct HidingSpot {
    pub object: usize,
    pub body: BodyHandle,
    pub center: Vec2,
    pub occupant: Option<String>,
}

impl HidingSpot {
    fn admits(&self, id: &str) -> bool {
        self.occupant.as_deref().is_none_or(|o| o == id)
    }
}

/// An item placed in the level for this round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundItem {
    pub kind: ItemKind,
    pub position: Vec2,
    pub collected_by: Option<String>,
}

pub struct Round {
    config: GameConfig,
    status: RoundStatus,
    time_left: f32,
    players: BTreeMap<String, PlayerState>,
    spots: Vec<HidingSpot>,
    exits: Vec<ExitPoint>,
    items: Vec<RoundItem>,
}

impl Round {
    pub fn new(config: GameConfig) -> Self {
        let time_left = config.round_time;
        Self {
            config,
            status: RoundStatus::Waiting,
            time_left,
            players: BTreeMap::new(),
            spots: Vec::new(),
            exits: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// Seconds left on the clock.
    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn player(&self, id: &str) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    pub fn hiding_spots(&self) -> &[HidingSpot] {
        &self.spots
    }

    pub fn exits(&self) -> &[ExitPoint] {
        &self.exits
    }

    pub fn items(&self) -> &[RoundItem] {
        &self.items
    }

    /// Add a locally controlled player and spawn its body.
    pub fn join(
        &mut self,
        world: &mut PhysicsWorld,
        id: &str,
        name: &str,
        role: Role,
        spawn: Vec2,
    ) -> Result<BodyHandle, GameError> {
        self.add_player(world, id, name, role, spawn, false)
    }

    /// Add a player simulated by another peer.
    pub fn join_remote(
        &mut self,
        world: &mut PhysicsWorld,
        id: &str,
        name: &str,
        role: Role,
        spawn: Vec2,
    ) -> Result<BodyHandle, GameError> {
        self.add_player(world, id, name, role, spawn, true)
    }

    fn add_player(
        &mut self,
        world: &mut PhysicsWorld,
        id: &str,
        name: &str,
        role: Role,
        spawn: Vec2,
        remote: bool,
    ) -> Result<BodyHandle, GameError> {
        if let RoundStatus::Ended(_) = self.status {
            return Err(self.wrong_status("waiting or playing"));
        }
        if self.players.contains_key(id) {
            return Err(GameError::DuplicatePlayer(id.to_owned()));
        }

        let radius = match role {
            Role::Granny => self.config.granny_size,
            Role::Runner => self.config.player_size,
        };
        let body = if remote {
            BodyFactory::remote_player(spawn.x, spawn.y, radius, BodyOverrides::new())?
        } else {
            BodyFactory::player(spawn.x, spawn.y, radius, BodyOverrides::new())?
        };
        let handle = world.add_body(body);

        self.players.insert(
            id.to_owned(),
            PlayerState {
                id: id.to_owned(),
                name: name.to_owned(),
                role,
                remote,
                hiding: false,
                hiding_spot: None,
                caught: false,
                escaped: false,
                sprinting: false,
                inventory: Vec::new(),
                radius,
                body: Some(handle),
                parked: None,
                entered_from: None,
            },
        );
        info!(player = id, ?role, remote, "player joined");
        Ok(handle)
    }

    /// Remove a player and its body. Frees any spot it occupied.
    pub fn leave(&mut self, world: &mut PhysicsWorld, id: &str) -> Result<(), GameError> {
        let player = self
            .players
            .remove(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.to_owned()))?;
        if let Some(handle) = player.body {
            world.remove_body(handle);
        }
        self.free_spot_of(id);
        info!(player = id, "player left");
        Ok(())
    }

    /// Begin play on a populated level.
    pub fn start(&mut self, level: &LevelBodies) -> Result<(), GameError> {
        if self.status != RoundStatus::Waiting {
            return Err(self.wrong_status("waiting"));
        }
        if self.count(Role::Granny) == 0 || self.count(Role::Runner) == 0 {
            return Err(GameError::NotEnoughPlayers);
        }

        self.spots = level
            .hiding_spots
            .iter()
            .map(|s| HidingSpot {
                object: s.object,
                body: s.body,
                center: s.center,
                occupant: None,
            })
            .collect();
        self.exits = level.exits.clone();
        self.items = level
            .items
            .iter()
            .map(|i| RoundItem {
                kind: i.kind,
                position: i.position,
                collected_by: None,
            })
            .collect();
        self.time_left = self.config.round_time;
        self.status = RoundStatus::Playing;
        info!(
            players = self.players.len(),
            hiding_spots = self.spots.len(),
            items = self.items.len(),
            "round started"
        );
        Ok(())
    }

    /// Set a player's velocity from a direction input.
    ///
    /// The direction is normalized, so diagonal input is not faster. Hidden
    /// players stay put.
    pub fn steer(
        &mut self,
        world: &mut PhysicsWorld,
        id: &str,
        direction: Vec2,
        sprint: bool,
    ) -> Result<(), GameError> {
        self.require_playing()?;
        let config = &self.config;
        let player = self
            .players
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.to_owned()))?;
        if !player.is_free() {
            return Err(GameError::PlayerOut(id.to_owned()));
        }
        player.sprinting = sprint;
        if player.hiding {
            return Ok(());
        }

        let mut speed = match player.role {
            Role::Granny => config.granny_speed,
            Role::Runner => config.player_speed,
        };
        if sprint {
            speed *= config.sprint_multiplier;
        }

        let handle = player
            .body
            .ok_or_else(|| GameError::MissingBody(id.to_owned()))?;
        let body = world
            .body_mut(handle)
            .ok_or_else(|| GameError::MissingBody(id.to_owned()))?;
        body.velocity = geometry::normalize(direction) * speed;
        Ok(())
    }

    /// Hide in the nearest free spot, or come back out.
    ///
    /// Returns whether the player is hiding afterwards.
    pub fn toggle_hide(&mut self, world: &mut PhysicsWorld, id: &str) -> Result<bool, GameError> {
        self.require_playing()?;
        let player = self
            .players
            .get(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.to_owned()))?;
        if player.role == Role::Granny {
            return Err(GameError::GrannyCannotHide(id.to_owned()));
        }
        if !player.is_free() {
            return Err(GameError::PlayerOut(id.to_owned()));
        }

        if player.hiding {
            self.unhide(world, id);
            return Ok(false);
        }

        let position = player
            .position(world)
            .ok_or_else(|| GameError::MissingBody(id.to_owned()))?;
        let spot = self
            .nearest_free_spot(position)
            .ok_or(GameError::NoHidingSpotNearby)?;
        self.hide(world, id, Some(spot));
        Ok(true)
    }

    fn nearest_free_spot(&self, position: Vec2) -> Option<usize> {
        self.spots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.occupant.is_none())
            .map(|(i, s)| (i, geometry::distance(position, s.center)))
            .filter(|&(_, d)| d < self.config.hide_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Park a player as hidden, inside `spot` when it is free or already theirs.
    ///
    /// Without a usable spot the body stays parked where it stood.
    fn hide(&mut self, world: &mut PhysicsWorld, id: &str, spot: Option<usize>) {
        let Some(player) = self.players.get_mut(id) else {
            return;
        };
        let spot = spot
            .and_then(|i| self.spots.get_mut(i))
            .filter(|s| s.admits(id));
        player.entered_from = player.position(world);
        player.park(world);
        player.hiding = true;
        player.hiding_spot = None;
        let Some(spot) = spot else {
            debug!(player = id, "player hid outside any spot");
            return;
        };
        if let Some(body) = player.parked.as_mut() {
            body.position = spot.center;
            body.velocity = Vec2::ZERO;
        }
        player.hiding_spot = Some(spot.object);
        spot.occupant = Some(id.to_owned());
        debug!(player = id, object = spot.object, "player hid");
    }

    fn unhide(&mut self, world: &mut PhysicsWorld, id: &str) {
        let bounds = self
            .spots
            .iter()
            .find(|s| s.occupant.as_deref() == Some(id))
            .and_then(|s| world.body(s.body))
            .map(|b| b.compute_aabb());
        self.free_spot_of(id);
        let Some(player) = self.players.get_mut(id) else {
            return;
        };
        let parked_at = player.parked.as_ref().map(|b| b.position);
        let position = match (bounds, player.entered_from) {
            (Some(bounds), Some(from)) => spot_exit(bounds, from, player.radius),
            (Some(bounds), None) => bounds.center(),
            (None, from) => parked_at.or(from).unwrap_or(Vec2::ZERO),
        };
        player.unpark(world, position);
        player.entered_from = None;
        player.hiding = false;
        player.hiding_spot = None;
        debug!(player = id, "player left hiding spot");
    }

    fn free_spot_of(&mut self, id: &str) {
        for spot in &mut self.spots {
            if spot.occupant.as_deref() == Some(id) {
                spot.occupant = None;
            }
        }
    }

    /// Advance the round clock and apply pickups, catches, escapes and end
    /// rules.
    ///
    /// Call after [`PhysicsWorld::update`] so positions are current.
    pub fn tick(&mut self, world: &mut PhysicsWorld, elapsed: f32) -> Vec<RoundEvent> {
        let mut events = Vec::new();
        if self.status != RoundStatus::Playing {
            return events;
        }
        self.time_left = (self.time_left - elapsed).max(0.0);
        self.pick_up_items(world, &mut events);

        let grannies: Vec<(String, Vec2, f32)> = self
            .players
            .values()
            .filter(|p| p.role == Role::Granny)
            .filter_map(|p| Some((p.id.clone(), p.position(world)?, p.radius)))
            .collect();

        for player in self.players.values_mut() {
            if player.role != Role::Runner || !player.is_free() || player.hiding {
                continue;
            }
            let Some(position) = player.position(world) else {
                continue;
            };

            let catcher = grannies.iter().find(|(_, granny, radius)| {
                geometry::distance(position, *granny) - radius - player.radius
                    < self.config.catch_distance
            });
            if let Some((granny, _, _)) = catcher {
                player.caught = true;
                player.park(world);
                info!(runner = %player.id, granny = %granny, "runner caught");
                events.push(RoundEvent::Caught {
                    runner: player.id.clone(),
                    granny: granny.clone(),
                });
                continue;
            }

            let escaped = self.exits.iter().any(|exit| {
                geometry::distance(position, exit.position) < self.config.escape_distance
                    && (!exit.requires_key || player.has_item(ItemKind::Key))
            });
            if escaped {
                player.escaped = true;
                player.park(world);
                info!(runner = %player.id, "runner escaped");
                events.push(RoundEvent::Escaped {
                    runner: player.id.clone(),
                });
            }
        }

        if let Some(reason) = self.end_reason() {
            self.status = RoundStatus::Ended(reason);
            info!(?reason, time_left = self.time_left, "round ended");
            events.push(RoundEvent::Ended(reason));
        }
        events
    }

    /// Give each uncollected item to the first free, visible player in reach.
    fn pick_up_items(&mut self, world: &PhysicsWorld, events: &mut Vec<RoundEvent>) {
        let reach = self.config.pickup_distance;
        for (index, item) in self.items.iter_mut().enumerate() {
            if item.collected_by.is_some() {
                continue;
            }
            let finder = self.players.values_mut().find(|p| {
                p.is_free()
                    && !p.hiding
                    && p.position(world)
                        .is_some_and(|pos| geometry::distance(pos, item.position) < reach)
            });
            let Some(player) = finder else {
                continue;
            };
            player.inventory.push(item.kind);
            item.collected_by = Some(player.id.clone());
            info!(player = %player.id, kind = ?item.kind, "item picked up");
            events.push(RoundEvent::PickedUp {
                player: player.id.clone(),
                item: index,
                kind: item.kind,
            });
        }
    }

    fn end_reason(&self) -> Option<EndReason> {
        let runners = || self.players.values().filter(|p| p.role == Role::Runner);
        if self.count(Role::Granny) == 0 || self.count(Role::Runner) == 0 {
            return Some(EndReason::Abandoned);
        }
        if !runners().any(PlayerState::is_free) {
            return Some(if runners().any(|p| p.escaped) {
                EndReason::RunnersEscaped
            } else {
                EndReason::GrannyWin
            });
        }
        if self.time_left <= 0.0 {
            return Some(EndReason::Timeout);
        }
        None
    }

    /// State of one player for publishing to the room.
    pub fn snapshot(&self, world: &PhysicsWorld, id: &str) -> Result<PlayerSnapshot, GameError> {
        let player = self
            .players
            .get(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.to_owned()))?;
        let position = player
            .position(world)
            .ok_or_else(|| GameError::MissingBody(id.to_owned()))?;
        let velocity = player.velocity(world);
        Ok(PlayerSnapshot {
            id: player.id.clone(),
            x: position.x,
            y: position.y,
            vx: velocity.x,
            vy: velocity.y,
            is_granny: player.role == Role::Granny,
            is_hiding: player.hiding,
            hiding_spot: player.hiding_spot,
            caught: player.caught,
        })
    }

    /// Overwrite a remote player's state from a snapshot.
    ///
    /// Returns `Ok(false)` without touching anything when the snapshot is
    /// about a locally controlled player. A granny never hides, and a runner
    /// naming a spot held by someone else hides without taking it.
    pub fn apply_snapshot(
        &mut self,
        world: &mut PhysicsWorld,
        snapshot: &PlayerSnapshot,
    ) -> Result<bool, GameError> {
        let id = snapshot.id.as_str();
        let player = self
            .players
            .get(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.to_owned()))?;
        if !player.remote {
            return Ok(false);
        }
        let position = Vec2::new(snapshot.x, snapshot.y);
        let velocity = Vec2::new(snapshot.vx, snapshot.vy);
        if !(position.is_finite() && velocity.is_finite()) {
            warn!(player = id, "dropping non-finite snapshot");
            return Ok(false);
        }

        if snapshot.is_hiding && player.role == Role::Granny {
            warn!(player = id, "ignoring hiding flag for a granny");
        } else if snapshot.is_hiding && !player.hiding {
            let spot = snapshot
                .hiding_spot
                .and_then(|object| self.spots.iter().position(|s| s.object == object));
            if snapshot.hiding_spot.is_some() && spot.is_none() {
                debug!(player = id, spot = ?snapshot.hiding_spot, "unknown hiding spot");
            }
            self.hide(world, id, spot);
        } else if !snapshot.is_hiding && player.hiding {
            self.unhide(world, id);
        }

        let Some(player) = self.players.get_mut(id) else {
            return Ok(false);
        };
        if snapshot.caught && !player.caught {
            player.caught = true;
            player.park(world);
        }
        match player.body.and_then(|h| world.body_mut(h)) {
            Some(body) => {
                body.position = position;
                body.velocity = velocity;
            }
            None if player.hiding && player.hiding_spot.is_none() => {
                if let Some(body) = player.parked.as_mut() {
                    body.position = position;
                }
            }
            None => {}
        }
        Ok(true)
    }

    fn count(&self, role: Role) -> usize {
        self.players.values().filter(|p| p.role == role).count()
    }

    fn require_playing(&self) -> Result<(), GameError> {
        if self.status == RoundStatus::Playing {
            Ok(())
        } else {
            Err(self.wrong_status("playing"))
        }
    }

    fn wrong_status(&self, expected: &'static str) -> GameError {
        GameError::WrongStatus {
            expected,
            actual: self.status.name(),
        }
    }
}

/// Point just outside `bounds` on the face nearest `from`, with room for a
/// circle of `radius`.
fn spot_exit(bounds: Aabb, from: Vec2, radius: f32) -> Vec2 {
    let center = bounds.center();
    let half = (bounds.max - bounds.min) * 0.5;
    let offset = (from - center) / half.max(Vec2::splat(f32::EPSILON));
    let along = bounds.closest_point(from);
    let clearance = radius + SPOT_EXIT_CLEARANCE;
    if offset.x.abs() >= offset.y.abs() {
        let x = if offset.x < 0.0 {
            bounds.min.x - clearance
        } else {
            bounds.max.x + clearance
        };
        Vec2::new(x, along.y)
    } else {
        let y = if offset.y < 0.0 {
            bounds.min.y - clearance
        } else {
            bounds.max.y + clearance
        };
        Vec2::new(along.x, y)
    }
}
