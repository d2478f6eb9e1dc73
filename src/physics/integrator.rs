//! Force application and explicit Euler integration.

use glam::Vec2;
use tracing::warn;

use super::body_set::BodySet;

/// Apply gravity, velocity damping and the speed cap to dynamic bodies.
///
/// Gravity acts on `vy` only and only when positive. Damping multiplies both
/// velocity components by `friction` every step. Bodies whose velocity is
/// no longer finite are left untouched.
pub fn apply_forces(bodies: &mut BodySet, gravity: f32, friction: f32, dt: f32) {
    for (handle, body) in bodies.iter_mut() {
        if !body.is_dynamic() {
            continue;
        }
        if !body.velocity.is_finite() {
            warn!(body = handle.index(), velocity = ?body.velocity, "skipping body with non-finite velocity");
            continue;
        }

        if gravity > 0.0 {
            body.velocity.y += gravity * dt;
        }

        body.velocity *= friction;

        if let Some(max_speed) = body.max_speed {
            let speed = body.velocity.length();
            if speed > max_speed {
                body.velocity = body.velocity / speed * max_speed;
            }
        }
    }
}

/// Integrate positions: p += v * dt.
pub fn integrate_positions(bodies: &mut BodySet, dt: f32) {
    for (_, body) in bodies.iter_mut() {
        if !body.is_dynamic() || !body.velocity.is_finite() {
            continue;
        }
        body.position += body.velocity * dt;
    }
}

/// Reset acceleration on every body. Velocity is kept.
pub fn clear_forces(bodies: &mut BodySet) {
    for (_, body) in bodies.iter_mut() {
        body.acceleration = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::BodyType;
    use crate::physics::factory::{BodyFactory, BodyOverrides};

    const EPS: f32 = 1e-5;

    #[test]
    fn test_friction_damps_velocity() {
        let mut bodies = BodySet::new();
        let h = bodies.insert(
            BodyFactory::circle(0.0, 0.0, 1.0, BodyOverrides::new().velocity(Vec2::new(10.0, -4.0)))
                .unwrap(),
        );

        apply_forces(&mut bodies, 0.0, 0.85, 1.0);

        let v = bodies.get(h).unwrap().velocity;
        assert!((v - Vec2::new(8.5, -3.4)).length() < EPS);
    }

    #[test]
    fn test_gravity_only_when_positive() {
        let mut bodies = BodySet::new();
        let h = bodies.insert(BodyFactory::circle(0.0, 0.0, 1.0, BodyOverrides::new()).unwrap());

        apply_forces(&mut bodies, -9.0, 1.0, 1.0);
        assert_eq!(bodies.get(h).unwrap().velocity, Vec2::ZERO);

        apply_forces(&mut bodies, 9.0, 1.0, 0.5);
        assert!((bodies.get(h).unwrap().velocity.y - 4.5).abs() < EPS);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut bodies = BodySet::new();
        let h = bodies.insert(
            BodyFactory::player(0.0, 0.0, 15.0, BodyOverrides::new().velocity(Vec2::new(30.0, 40.0)))
                .unwrap(),
        );

        apply_forces(&mut bodies, 0.0, 1.0, 1.0);

        let v = bodies.get(h).unwrap().velocity;
        assert!((v.length() - 5.0).abs() < EPS);
        assert!((v - Vec2::new(3.0, 4.0)).length() < EPS);
    }

    #[test]
    fn test_static_and_remote_bodies_are_not_integrated() {
        let mut bodies = BodySet::new();
        let wall = bodies.insert(
            BodyFactory::rect(
                5.0,
                5.0,
                10.0,
                10.0,
                BodyOverrides::new()
                    .fixed()
                    .velocity(Vec2::new(3.0, 3.0)),
            )
            .unwrap(),
        );
        let remote = bodies.insert(
            BodyFactory::player(
                0.0,
                0.0,
                15.0,
                BodyOverrides::new()
                    .body_type(BodyType::Remote)
                    .velocity(Vec2::new(2.0, 0.0)),
            )
            .unwrap(),
        );

        apply_forces(&mut bodies, 9.81, 0.85, 1.0);
        integrate_positions(&mut bodies, 1.0);

        assert_eq!(bodies.get(wall).unwrap().position, Vec2::new(5.0, 5.0));
        assert_eq!(bodies.get(remote).unwrap().position, Vec2::ZERO);
        assert_eq!(bodies.get(remote).unwrap().velocity, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_non_finite_velocity_is_skipped() {
        let mut bodies = BodySet::new();
        let h = bodies.insert(BodyFactory::circle(1.0, 1.0, 1.0, BodyOverrides::new()).unwrap());
        bodies.get_mut(h).unwrap().velocity = Vec2::new(f32::NAN, 0.0);

        apply_forces(&mut bodies, 0.0, 0.85, 1.0);
        integrate_positions(&mut bodies, 1.0);

        assert_eq!(bodies.get(h).unwrap().position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_clear_forces() {
        let mut bodies = BodySet::new();
        let h = bodies.insert(
            BodyFactory::circle(
                0.0,
                0.0,
                1.0,
                BodyOverrides::new()
                    .acceleration(Vec2::new(10.0, 20.0))
                    .velocity(Vec2::new(1.0, 1.0)),
            )
            .unwrap(),
        );

        clear_forces(&mut bodies);

        let body = bodies.get(h).unwrap();
        assert_eq!(body.acceleration, Vec2::ZERO);
        assert_eq!(body.velocity, Vec2::new(1.0, 1.0));
    }
}
