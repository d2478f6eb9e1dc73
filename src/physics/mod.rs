//! CPU 2D physics: circle and rectangle bodies, all-pairs collision, impulse
//! response and segment casts.
//!
//! # Architecture
//!
//! Each call to [`PhysicsWorld::update`] runs, in order:
//!
//! 1. Apply forces (gravity on `vy`, velocity damping, speed cap)
//! 2. Integrate positions
//! 3. Broadphase pair search (bounding boxes, every unordered pair)
//! 4. Narrowphase contact generation (shape-pair dispatch)
//! 5. Contact resolution (positional split, then one impulse per contact)
//! 6. Clear accelerations

pub mod body;
pub mod body_set;
pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod factory;
pub mod geometry;
pub mod integrator;
pub mod narrowphase;
pub mod raycast;
pub mod solver;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use self::body::Body;
use self::body_set::{BodyHandle, BodySet};
use self::broadphase::AllPairs;
use self::contact::Contact;
use self::narrowphase::detect_collision;
use self::raycast::RayHit;

/// Configuration for the physics simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to `vy` each step when positive. Default: 0.
    pub gravity: f32,
    /// Per-step velocity multiplier. Default: 0.85.
    pub friction: f32,
    /// Restitution for bodies that do not set their own. Default: 0.3.
    pub elasticity: f32,
    /// Depth reported for any contact involving a rectangle. Default: 10.
    pub rect_contact_depth: f32,
    /// Slack allowed in front of the target by `is_visible`. Default: 0.1.
    pub visibility_epsilon: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.0,
            friction: 0.85,
            elasticity: 0.3,
            rect_contact_depth: 10.0,
            visibility_epsilon: 0.1,
        }
    }
}

/// The physics world: owns every live body for one simulation.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bodies: BodySet,
    broadphase: AllPairs,
    contacts: Vec<Contact>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            bodies: BodySet::new(),
            broadphase: AllPairs::new(),
            contacts: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.insert(body);
        debug!(body = handle.index(), "body added");
        handle
    }

    /// Remove a body. Returns `None` if it is not in the world.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        let removed = self.bodies.remove(handle);
        if removed.is_some() {
            debug!(body = handle.index(), "body removed");
        }
        removed
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Mutable access for callers writing state between ticks.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Drop every body, e.g. between rounds.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.contacts.clear();
    }

    /// Contacts found during the last call to [`update`](Self::update).
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Step the simulation forward by `delta_time` seconds.
    pub fn update(&mut self, delta_time: f32) {
        // 1. Apply forces
        integrator::apply_forces(
            &mut self.bodies,
            self.config.gravity,
            self.config.friction,
            delta_time,
        );

        // 2. Integrate positions
        integrator::integrate_positions(&mut self.bodies, delta_time);

        // 3-4. Detect collisions
        self.detect_contacts();

        // 5. Resolve collisions
        solver::solve_contacts(&self.contacts, &mut self.bodies, self.config.elasticity);

        // 6. Clear forces
        integrator::clear_forces(&mut self.bodies);

        trace!(
            bodies = self.bodies.len(),
            contacts = self.contacts.len(),
            delta_time,
            "physics step"
        );
    }

    fn detect_contacts(&mut self) {
        self.contacts.clear();
        let pairs = self.broadphase.find_pairs(&self.bodies);
        for (handle_a, handle_b) in pairs {
            let (Some(a), Some(b)) = (self.bodies.get(handle_a), self.bodies.get(handle_b)) else {
                continue;
            };
            if let Some(info) = detect_collision(a, b, self.config.rect_contact_depth) {
                self.contacts.push(Contact {
                    body_a: handle_a,
                    body_b: handle_b,
                    normal: info.normal,
                    depth: info.depth,
                });
            }
        }
    }

    /// Whether two bodies currently overlap. Unknown handles never collide.
    pub fn is_colliding(&self, a: BodyHandle, b: BodyHandle) -> bool {
        match (self.bodies.get(a), self.bodies.get(b)) {
            (Some(a), Some(b)) => narrowphase::is_colliding(a, b),
            _ => false,
        }
    }

    /// Closest body hit by the segment `from -> to`, skipping `ignore`.
    pub fn raycast(&self, from: Vec2, to: Vec2, ignore: &[BodyHandle]) -> Option<RayHit> {
        raycast::raycast(&self.bodies, from, to, ignore)
    }

    /// Whether `to` can be seen from `from`.
    pub fn is_visible(&self, from: Vec2, to: Vec2, ignore: &[BodyHandle]) -> bool {
        raycast::is_visible(
            &self.bodies,
            from,
            to,
            ignore,
            self.config.visibility_epsilon,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::BodyType;
    use crate::physics::factory::{BodyFactory, BodyOverrides};

    const EPS: f32 = 1e-4;

    fn frictionless() -> PhysicsWorld {
        PhysicsWorld::new(PhysicsConfig {
            friction: 1.0,
            gravity: 0.0,
            ..PhysicsConfig::default()
        })
    }

    fn ball(x: f32, vx: f32) -> Body {
        BodyFactory::circle(
            x,
            0.0,
            10.0,
            BodyOverrides::new()
                .velocity(Vec2::new(vx, 0.0))
                .restitution(1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, 0.0);
        assert_eq!(config.friction, 0.85);
        assert_eq!(config.elasticity, 0.3);
        assert_eq!(config.rect_contact_depth, 10.0);
        assert_eq!(config.visibility_epsilon, 0.1);
    }

    #[test]
    fn test_head_on_elastic_exchange() {
        let mut world = frictionless();
        let a = world.add_body(ball(0.0, 5.0));
        let b = world.add_body(ball(15.0, 0.0));

        world.update(1.0);

        assert_eq!(world.contacts().len(), 1);
        let contact = world.contacts()[0];
        assert_eq!((contact.body_a, contact.body_b), (a, b));
        assert!((contact.normal - Vec2::X).length() < EPS);
        assert!((contact.depth - 10.0).abs() < EPS);

        let body_a = world.body(a).unwrap();
        let body_b = world.body(b).unwrap();
        assert!(body_a.velocity.x.abs() < EPS);
        assert!((body_b.velocity.x - 5.0).abs() < EPS);
        // Separated along the normal by half the depth each.
        assert!(body_a.position.x.abs() < EPS);
        assert!((body_b.position.x - 20.0).abs() < EPS);
    }

    #[test]
    fn test_static_body_never_moves() {
        let mut world = PhysicsWorld::default();
        let wall = world.add_body(
            BodyFactory::rect(
                0.0,
                0.0,
                40.0,
                40.0,
                BodyOverrides::new()
                    .fixed()
                    .infinite_mass()
                    .velocity(Vec2::new(100.0, 100.0)),
            )
            .unwrap(),
        );
        world.add_body(
            BodyFactory::player(30.0, 20.0, 15.0, BodyOverrides::new().velocity(Vec2::new(-5.0, 0.0)))
                .unwrap(),
        );

        for _ in 0..30 {
            world.update(1.0 / 60.0);
        }

        assert_eq!(world.body(wall).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn test_player_is_pushed_out_of_wall() {
        let mut world = PhysicsWorld::default();
        world.add_body(BodyFactory::wall(0.0, 0.0, 40.0, 40.0).unwrap());
        let player =
            world.add_body(BodyFactory::player(45.0, 20.0, 10.0, BodyOverrides::new()).unwrap());

        world.update(1.0 / 60.0);

        // Constant rectangle depth: pushed by half of 10 along +x.
        let p = world.body(player).unwrap();
        assert!((p.position - Vec2::new(50.0, 20.0)).length() < EPS);
    }

    #[test]
    fn test_remote_body_collides_but_is_not_moved() {
        let mut world = frictionless();
        let local = world.add_body(ball(0.0, 0.0));
        let remote = world.add_body(
            BodyFactory::remote_player(15.0, 0.0, 10.0, BodyOverrides::new().velocity(Vec2::X))
                .unwrap(),
        );
        assert_eq!(world.body(remote).unwrap().body_type, BodyType::Remote);

        world.update(1.0);

        assert_eq!(world.body(remote).unwrap().position, Vec2::new(15.0, 0.0));
        assert!((world.body(local).unwrap().position.x + 2.5).abs() < EPS);
    }

    #[test]
    fn test_accelerations_cleared_after_update() {
        let mut world = PhysicsWorld::default();
        let h = world.add_body(
            BodyFactory::circle(
                0.0,
                0.0,
                1.0,
                BodyOverrides::new().acceleration(Vec2::new(1.0, 1.0)),
            )
            .unwrap(),
        );
        world.update(0.016);
        assert_eq!(world.body(h).unwrap().acceleration, Vec2::ZERO);
    }

    #[test]
    fn test_remove_body() {
        let mut world = PhysicsWorld::default();
        let a = world.add_body(ball(0.0, 0.0));
        let b = world.add_body(ball(5.0, 0.0));

        assert!(world.is_colliding(a, b));
        assert!(world.remove_body(a).is_some());
        assert!(world.remove_body(a).is_none());
        assert!(!world.is_colliding(a, b));
        assert_eq!(world.len(), 1);

        world.update(1.0);
        assert!(world.contacts().is_empty());
    }

    #[test]
    fn test_contacts_rebuilt_each_step() {
        let mut world = frictionless();
        world.add_body(ball(0.0, 0.0));
        world.add_body(ball(15.0, 0.0));

        world.update(1.0);
        assert_eq!(world.contacts().len(), 1);

        // After separation the pair just touches and no longer collides.
        world.update(1.0);
        assert!(world.contacts().is_empty());
    }

    #[test]
    fn test_visibility_through_world() {
        let mut world = PhysicsWorld::default();
        let blocker =
            world.add_body(BodyFactory::circle(50.0, 0.0, 10.0, BodyOverrides::new()).unwrap());

        assert!(!world.is_visible(Vec2::ZERO, Vec2::new(100.0, 0.0), &[]));
        assert!(world.is_visible(Vec2::ZERO, Vec2::new(100.0, 0.0), &[blocker]));
        assert_eq!(
            world.raycast(Vec2::ZERO, Vec2::new(100.0, 0.0), &[]).unwrap().body,
            blocker
        );
    }
}
