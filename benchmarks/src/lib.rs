//! Scene builders shared by the benchmarks.

use glam::Vec2;
use granny_sim::{
    BodyFactory, BodyOverrides, BodySet, Contact, GameConfig, Level, PhysicsWorld, Role, Round,
};

/// Tiny deterministic LCG so scenes are identical between runs.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32) / ((1u64 << 24) as f32)
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

/// `n` moving circles packed into a square sized for frequent overlaps.
pub fn setup_circle_world(n: usize) -> BodySet {
    let side = (n as f32).sqrt() * 25.0;
    let mut rng = Lcg::new(42);
    let mut bodies = BodySet::new();
    for _ in 0..n {
        let overrides =
            BodyOverrides::new().velocity(Vec2::new(rng.range(-3.0, 3.0), rng.range(-3.0, 3.0)));
        let (x, y) = (rng.range(0.0, side), rng.range(0.0, side));
        bodies.insert(BodyFactory::circle(x, y, 10.0, overrides).expect("valid circle"));
    }
    bodies
}

/// Circles and rectangles, one in four static.
pub fn setup_mixed_world(n: usize) -> BodySet {
    let side = (n as f32).sqrt() * 30.0;
    let mut rng = Lcg::new(7);
    let mut bodies = BodySet::new();
    for i in 0..n {
        let (x, y) = (rng.range(0.0, side), rng.range(0.0, side));
        let body = match i % 4 {
            0 => BodyFactory::wall(x, y, 40.0, 40.0),
            1 => BodyFactory::rect(x, y, 20.0, 30.0, BodyOverrides::new()),
            _ => BodyFactory::player(x, y, 15.0, BodyOverrides::new()),
        };
        bodies.insert(body.expect("valid body"));
    }
    bodies
}

/// Circles spread so thin that almost no pair overlaps.
pub fn setup_sparse_world(n: usize) -> BodySet {
    let side = (n as f32).sqrt() * 200.0;
    let mut rng = Lcg::new(3);
    let mut bodies = BodySet::new();
    for _ in 0..n {
        let (x, y) = (rng.range(0.0, side), rng.range(0.0, side));
        bodies.insert(BodyFactory::circle(x, y, 5.0, BodyOverrides::new()).expect("valid circle"));
    }
    bodies
}

/// `n` overlapping ball pairs and one head-on contact per pair.
pub fn setup_contacts(n: usize) -> (BodySet, Vec<Contact>) {
    let mut bodies = BodySet::new();
    let mut contacts = Vec::with_capacity(n);
    for i in 0..n {
        let y = i as f32 * 50.0;
        let a = BodyFactory::circle(0.0, y, 10.0, BodyOverrides::new().velocity(Vec2::X));
        let b = BodyFactory::circle(15.0, y, 10.0, BodyOverrides::new().velocity(-Vec2::X));
        let body_a = bodies.insert(a.expect("valid circle"));
        let body_b = bodies.insert(b.expect("valid circle"));
        contacts.push(Contact {
            body_a,
            body_b,
            normal: Vec2::X,
            depth: 5.0,
        });
    }
    (bodies, contacts)
}

/// A physics world holding `n` moving circles.
pub fn setup_scene(n: usize) -> PhysicsWorld {
    let mut world = PhysicsWorld::default();
    for (_, body) in setup_circle_world(n).iter() {
        world.add_body(body.clone());
    }
    world
}

/// The built-in house with one granny and `runners` runners in play.
pub fn setup_house_round(runners: usize) -> (PhysicsWorld, Round) {
    let level = Level::house();
    let mut world = PhysicsWorld::default();
    let mut round = Round::new(GameConfig::default());
    let bodies = level.populate(&mut world).expect("house level populates");

    round
        .join(&mut world, "granny", "Granny", Role::Granny, Vec2::new(220.0, 340.0))
        .expect("granny joins");
    for i in 0..runners {
        let spawn = Vec2::new(100.0 + (i % 16) as f32 * 50.0, 420.0 + (i / 16) as f32 * 40.0);
        round
            .join(&mut world, &format!("runner{i}"), "Runner", Role::Runner, spawn)
            .expect("runner joins");
    }
    round.start(&bodies).expect("round starts");
    (world, round)
}

#[cfg(test)]
mod tests {
    use super::*;
    use granny_sim::RoundStatus;

    #[test]
    fn test_setup_house_round_is_playing() {
        let (world, round) = setup_house_round(3);
        assert_eq!(round.status(), RoundStatus::Playing);
        assert_eq!(round.players().count(), 4);
        assert!(round.player("runner2").unwrap().position(&world).is_some());
    }

    #[test]
    fn test_setup_scene_fills_world() {
        let world = setup_scene(50);
        assert!(!world.is_empty());
    }
}
