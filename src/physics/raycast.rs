//! Segment casts and line-of-sight queries over a body set.

use glam::Vec2;

use super::body::Shape;
use super::body_set::{BodyHandle, BodySet};
use super::geometry::{self, RayIntersection};

/// Closest intersection found by [`raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: BodyHandle,
    pub point: Vec2,
    pub normal: Vec2,
    /// Distance from the segment origin to `point`.
    pub distance: f32,
}

/// Cast the segment `from -> to` against every body not in `ignore`.
pub fn raycast(bodies: &BodySet, from: Vec2, to: Vec2, ignore: &[BodyHandle]) -> Option<RayHit> {
    let mut closest: Option<RayHit> = None;

    for (handle, body) in bodies.iter() {
        if ignore.contains(&handle) {
            continue;
        }

        let hit: Option<RayIntersection> = match body.shape() {
            Shape::Circle { radius } => geometry::ray_circle_intersect(
                from,
                to,
                &geometry::Circle {
                    center: body.position,
                    radius,
                },
            ),
            Shape::Rect { .. } => geometry::ray_rect_intersect(from, to, &body.compute_aabb()),
        };

        let Some(hit) = hit else {
            continue;
        };

        let distance = geometry::distance(from, hit.point);
        if closest.map_or(true, |c| distance < c.distance) {
            closest = Some(RayHit {
                body: handle,
                point: hit.point,
                normal: hit.normal,
                distance,
            });
        }
    }

    closest
}

/// Whether nothing blocks the segment before `epsilon` short of `to`.
pub fn is_visible(
    bodies: &BodySet,
    from: Vec2,
    to: Vec2,
    ignore: &[BodyHandle],
    epsilon: f32,
) -> bool {
    match raycast(bodies, from, to, ignore) {
        None => true,
        Some(hit) => hit.distance > geometry::distance(from, to) - epsilon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::factory::{BodyFactory, BodyOverrides};

    const EPS: f32 = 1e-4;

    fn set_with_circle(x: f32, y: f32, r: f32) -> (BodySet, BodyHandle) {
        let mut bodies = BodySet::new();
        let h = bodies.insert(BodyFactory::circle(x, y, r, BodyOverrides::new()).unwrap());
        (bodies, h)
    }

    #[test]
    fn test_raycast_returns_first_boundary() {
        let (cx, cy, r) = (200.0, 50.0, 8.0);
        let (bodies, h) = set_with_circle(cx, cy, r);

        let hit = raycast(
            &bodies,
            Vec2::new(cx - 10.0 * r, cy),
            Vec2::new(cx + 10.0 * r, cy),
            &[],
        )
        .unwrap();

        assert_eq!(hit.body, h);
        assert!((hit.point.x - (cx - r)).abs() < EPS);
        assert!((hit.distance - 9.0 * r).abs() < EPS);
    }

    #[test]
    fn test_raycast_picks_closest() {
        let mut bodies = BodySet::new();
        let far = bodies.insert(BodyFactory::wall(80.0, -10.0, 10.0, 20.0).unwrap());
        let near = bodies.insert(BodyFactory::circle(40.0, 0.0, 5.0, BodyOverrides::new()).unwrap());

        let hit = raycast(&bodies, Vec2::ZERO, Vec2::new(100.0, 0.0), &[]).unwrap();
        assert_eq!(hit.body, near);

        let hit = raycast(&bodies, Vec2::ZERO, Vec2::new(100.0, 0.0), &[near]).unwrap();
        assert_eq!(hit.body, far);
        assert!((hit.distance - 80.0).abs() < EPS);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_raycast_no_bodies() {
        let bodies = BodySet::new();
        assert!(raycast(&bodies, Vec2::ZERO, Vec2::new(10.0, 0.0), &[]).is_none());
    }

    #[test]
    fn test_visible_past_obstacle_beyond_target() {
        let (bodies, _) = set_with_circle(200.0, 0.0, 10.0);
        assert!(is_visible(&bodies, Vec2::ZERO, Vec2::new(100.0, 0.0), &[], 0.1));
    }

    #[test]
    fn test_blocked_by_obstacle_between() {
        let (bodies, h) = set_with_circle(50.0, 0.0, 10.0);
        assert!(!is_visible(&bodies, Vec2::ZERO, Vec2::new(100.0, 0.0), &[], 0.1));
        assert!(is_visible(&bodies, Vec2::ZERO, Vec2::new(100.0, 0.0), &[h], 0.1));
    }

    #[test]
    fn test_obstacle_at_target_counts_as_visible() {
        // The target's own surface sits exactly at the end of the segment.
        let (bodies, _) = set_with_circle(110.0, 0.0, 10.0);
        assert!(is_visible(&bodies, Vec2::ZERO, Vec2::new(100.0, 0.0), &[], 0.1));
    }
}
