use std::fs;

use anyhow::{Context, Result};
use glam::{IVec2, Vec2};
use granny_sim::game::level::{ItemKind, ObjectKind};
use granny_sim::{
    GameConfig, Level, PhysicsWorld, PlayerSnapshot, PositionPublisher, RemoteStateBuffer, Role,
    Round, RoundEvent, RoundStatus,
};

const TICK_SECONDS: f32 = 1.0 / 60.0;
const MAX_TICKS: u32 = 60 * 150;
/// Ticks before the scripted peer dives into its hiding spot.
const PEER_HIDE_AFTER: u32 = 30;

fn load_level(path: &str) -> Result<Level> {
    let json = fs::read_to_string(path).with_context(|| format!("failed to read level {path}"))?;
    Level::from_json(&json).with_context(|| format!("failed to load level {path}"))
}

/// Stand-in for another peer: stays put, then reports itself hidden.
struct ScriptedPeer {
    id: String,
    position: Vec2,
    hiding_spot: Option<usize>,
}

impl ScriptedPeer {
    fn message(&self, tick: u32) -> Result<String> {
        let hiding = tick >= PEER_HIDE_AFTER && self.hiding_spot.is_some();
        let snapshot = PlayerSnapshot {
            id: self.id.clone(),
            x: self.position.x,
            y: self.position.y,
            vx: 0.0,
            vy: 0.0,
            is_granny: false,
            is_hiding: hiding,
            hiding_spot: if hiding { self.hiding_spot } else { None },
            caught: false,
        };
        Ok(snapshot.to_json()?)
    }
}

/// Walk the granny toward the closest runner she can see.
fn chase(round: &Round, world: &PhysicsWorld, granny: &str) -> Option<Vec2> {
    let hunter = round.player(granny)?;
    let from = hunter.position(world)?;
    round
        .players()
        .filter(|p| p.role == Role::Runner && p.is_free() && !p.hiding)
        .filter_map(|p| {
            let to = p.position(world)?;
            let ignore: Vec<_> = [hunter.body(), p.body()].into_iter().flatten().collect();
            world.is_visible(from, to, &ignore).then_some(to)
        })
        .min_by(|a, b| from.distance(*a).total_cmp(&from.distance(*b)))
        .map(|to| to - from)
}

/// Head for the nearest key still lying around, then for the exit.
fn errand(round: &Round, world: &PhysicsWorld, runner: &str, exit: Vec2) -> Option<Vec2> {
    let player = round.player(runner)?;
    let from = player.position(world)?;
    if player.has_item(ItemKind::Key) {
        return Some(exit - from);
    }
    round
        .items()
        .iter()
        .filter(|i| i.kind == ItemKind::Key && i.collected_by.is_none())
        .map(|i| i.position)
        .min_by(|a, b| from.distance(*a).total_cmp(&from.distance(*b)))
        .or(Some(exit))
        .map(|to| to - from)
}

fn main() -> Result<()> {
    env_logger::init();

    let level = match std::env::args().nth(1) {
        Some(path) => load_level(&path)?,
        None => Level::house(),
    };

    let config = GameConfig::default();
    let mut world = PhysicsWorld::default();
    let bodies = level
        .populate(&mut world)
        .context("failed to populate level")?;
    let mut round = Round::new(config.clone());

    let granny_spawn = level.cell_center(IVec2::new(5, 8));
    let runner_spawn = level.cell_center(IVec2::new(16, 13));
    let peer_spawn = level.cell_center(IVec2::new(9, 13));
    round.join(&mut world, "granny", "Granny", Role::Granny, granny_spawn)?;
    round.join(&mut world, "runner", "Runner", Role::Runner, runner_spawn)?;
    round.join_remote(&mut world, "peer", "Peer", Role::Runner, peer_spawn)?;
    round.start(&bodies).context("failed to start round")?;

    let exit = bodies
        .exits
        .first()
        .map(|e| e.position)
        .context("level has no exit")?;
    let peer = ScriptedPeer {
        id: "peer".to_owned(),
        position: peer_spawn,
        hiding_spot: level
            .objects
            .iter()
            .position(|o| o.kind == ObjectKind::Closet && o.room == "entrance"),
    };

    let mut publisher = PositionPublisher::new("runner", config.publish_interval);
    let mut remote = RemoteStateBuffer::new();
    let mut published: Vec<PlayerSnapshot> = Vec::new();

    log::info!(
        "round started: {} bodies, {} hiding spots",
        world.len(),
        bodies.hiding_spots.len()
    );

    for tick in 0..MAX_TICKS {
        remote.push_json(&peer.message(tick)?)?;
        remote.apply(&mut world, &mut round);

        if round.player("runner").is_some_and(|p| p.is_free()) {
            let heading = errand(&round, &world, "runner", exit).unwrap_or(Vec2::ZERO);
            round.steer(&mut world, "runner", heading, true)?;
        }
        let hunt = chase(&round, &world, "granny").unwrap_or(Vec2::ZERO);
        round.steer(&mut world, "granny", hunt, false)?;

        world.update(1.0);

        for event in round.tick(&mut world, TICK_SECONDS) {
            match event {
                RoundEvent::Caught { runner, granny } => {
                    log::info!("tick {tick}: {granny} caught {runner}")
                }
                RoundEvent::Escaped { runner } => log::info!("tick {tick}: {runner} escaped"),
                RoundEvent::PickedUp { player, kind, .. } => {
                    log::info!("tick {tick}: {player} picked up {kind:?}")
                }
                RoundEvent::Ended(reason) => log::info!("tick {tick}: round ended ({reason:?})"),
            }
        }

        publisher.update(&round, &world, TICK_SECONDS, &mut published)?;

        if let RoundStatus::Ended(_) = round.status() {
            break;
        }
    }

    log::info!(
        "status {:?}, {:.1}s left, {} snapshots published",
        round.status(),
        round.time_left(),
        published.len()
    );
    for player in round.players() {
        log::info!(
            "{} ({:?}): caught={} escaped={} hiding={}",
            player.name,
            player.role,
            player.caught,
            player.escaped,
            player.hiding
        );
    }

    Ok(())
}
