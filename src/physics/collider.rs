//! World-space shape views of a body.

use glam::Vec2;

use super::body::{Body, Shape};
use super::geometry::{Aabb, Circle};

impl Body {
    /// Circle in world space, if this body is one.
    #[inline]
    pub fn as_circle(&self) -> Option<Circle> {
        match self.shape() {
            Shape::Circle { radius } => Some(Circle {
                center: self.position,
                radius,
            }),
            Shape::Rect { .. } => None,
        }
    }

    /// Compute the world-space AABB for this body.
    #[inline]
    pub fn compute_aabb(&self) -> Aabb {
        match self.shape() {
            Shape::Circle { radius } => Aabb {
                min: self.position - Vec2::splat(radius),
                max: self.position + Vec2::splat(radius),
            },
            Shape::Rect { width, height } => {
                Aabb::from_corner(self.position, Vec2::new(width, height))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::physics::factory::{BodyFactory, BodyOverrides};
    use glam::Vec2;

    #[test]
    fn test_circle_aabb() {
        let body = BodyFactory::circle(0.0, 5.0, 1.0, BodyOverrides::new()).unwrap();
        let aabb = body.compute_aabb();
        assert_eq!(aabb.min, Vec2::new(-1.0, 4.0));
        assert_eq!(aabb.max, Vec2::new(1.0, 6.0));
    }

    #[test]
    fn test_rect_aabb() {
        let body = BodyFactory::rect(1.0, 2.0, 3.0, 4.0, BodyOverrides::new()).unwrap();
        let aabb = body.compute_aabb();
        assert_eq!(aabb.min, Vec2::new(1.0, 2.0));
        assert_eq!(aabb.max, Vec2::new(4.0, 6.0));
        assert!(body.as_circle().is_none());
    }
}
