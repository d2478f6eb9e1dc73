//! Narrowphase: exact overlap tests dispatched on the shape pair.

use glam::Vec2;

use crate::physics::body::{Body, Shape};

use super::contact::ContactInfo;
use super::geometry::{self, Circle};

/// Whether two bodies overlap.
pub fn is_colliding(a: &Body, b: &Body) -> bool {
    match (a.shape(), b.shape()) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            geometry::circle_circle_intersects(
                &Circle {
                    center: a.position,
                    radius: ra,
                },
                &Circle {
                    center: b.position,
                    radius: rb,
                },
            )
        }
        (Shape::Circle { radius }, Shape::Rect { .. }) => geometry::circle_rect_intersects(
            &Circle {
                center: a.position,
                radius,
            },
            &b.compute_aabb(),
        ),
        (Shape::Rect { .. }, Shape::Circle { radius }) => geometry::circle_rect_intersects(
            &Circle {
                center: b.position,
                radius,
            },
            &a.compute_aabb(),
        ),
        (Shape::Rect { .. }, Shape::Rect { .. }) => {
            geometry::rect_rect_intersects(&a.compute_aabb(), &b.compute_aabb())
        }
    }
}

/// Penetration depth of an overlapping pair.
///
/// Exact for two circles. Any pair involving a rectangle reports
/// `rect_depth` instead of a minimum translation distance.
pub fn penetration_depth(a: &Body, b: &Body, rect_depth: f32) -> f32 {
    match (a.as_circle(), b.as_circle()) {
        (Some(ca), Some(cb)) => geometry::circle_penetration(&ca, &cb),
        _ => rect_depth,
    }
}

/// Center-to-center unit normal from `a` to `b`.
#[inline]
pub fn collision_normal(a: &Body, b: &Body) -> Vec2 {
    geometry::collision_normal(a.center(), b.center())
}

/// Full contact for an overlapping pair, `None` when separated.
pub fn detect_collision(a: &Body, b: &Body, rect_depth: f32) -> Option<ContactInfo> {
    if !is_colliding(a, b) {
        return None;
    }
    Some(ContactInfo {
        normal: collision_normal(a, b),
        depth: penetration_depth(a, b, rect_depth).max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::factory::{BodyFactory, BodyOverrides};

    const EPS: f32 = 1e-5;

    fn circle(x: f32, y: f32, r: f32) -> Body {
        BodyFactory::circle(x, y, r, BodyOverrides::new()).unwrap()
    }

    #[test]
    fn test_circle_circle_contact() {
        let a = circle(0.0, 0.0, 5.0);
        let b = circle(8.0, 0.0, 5.0);
        let info = detect_collision(&a, &b, 10.0).unwrap();
        assert!((info.normal - Vec2::X).length() < EPS);
        assert_eq!(info.depth, 2.0);
    }

    #[test]
    fn test_circle_circle_no_contact() {
        let a = circle(0.0, 0.0, 5.0);
        let b = circle(10.0, 0.0, 5.0);
        assert!(detect_collision(&a, &b, 10.0).is_none());
    }

    #[test]
    fn test_rect_pairs_use_constant_depth() {
        let wall = BodyFactory::wall(0.0, 0.0, 40.0, 40.0).unwrap();
        let player = circle(45.0, 20.0, 10.0);
        let other_wall = BodyFactory::wall(30.0, 30.0, 40.0, 40.0).unwrap();

        let info = detect_collision(&player, &wall, 10.0).unwrap();
        assert_eq!(info.depth, 10.0);
        let info = detect_collision(&wall, &player, 10.0).unwrap();
        assert_eq!(info.depth, 10.0);
        let info = detect_collision(&wall, &other_wall, 10.0).unwrap();
        assert_eq!(info.depth, 10.0);
    }

    #[test]
    fn test_rect_circle_dispatch_is_symmetric() {
        let wall = BodyFactory::wall(0.0, 0.0, 40.0, 40.0).unwrap();
        let near = circle(45.0, 20.0, 10.0);
        let far = circle(55.0, 20.0, 10.0);
        assert!(is_colliding(&wall, &near));
        assert!(is_colliding(&near, &wall));
        assert!(!is_colliding(&wall, &far));
        assert!(!is_colliding(&far, &wall));
    }

    #[test]
    fn test_normal_uses_rect_center() {
        let wall = BodyFactory::wall(0.0, 0.0, 40.0, 40.0).unwrap();
        let player = circle(45.0, 20.0, 10.0);
        let n = collision_normal(&wall, &player);
        assert!((n - Vec2::X).length() < EPS);
    }

    #[test]
    fn test_coincident_centers_fallback_normal() {
        let a = circle(3.0, 3.0, 1.0);
        let b = circle(3.0, 3.0, 1.0);
        let info = detect_collision(&a, &b, 10.0).unwrap();
        assert_eq!(info.normal, Vec2::new(0.0, 1.0));
        assert_eq!(info.depth, 2.0);
    }
}
