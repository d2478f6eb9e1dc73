//! Stateless 2D geometry: distances, overlap tests and segment casts.
//!
//! Overlap tests are strict: shapes that only touch do not intersect.
//! Segment casts work on the closed parameter range `[0, 1]` from `p0` to
//! `p1`, not on an infinite ray.

use glam::Vec2;

/// Normal returned when two centers coincide.
pub const FALLBACK_NORMAL: Vec2 = Vec2::new(0.0, 1.0);

/// Below this extent a segment is treated as parallel to an axis.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Circle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Rectangle from its top-left corner and size.
    #[inline]
    pub fn from_corner(corner: Vec2, size: Vec2) -> Self {
        Self {
            min: corner,
            max: corner + size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap test. Touching edges do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Closest point of the rectangle to `p`.
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Result of a segment cast against one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    pub point: Vec2,
    /// Surface normal at `point`, pointing out of the shape.
    pub normal: Vec2,
}

/// Euclidean distance.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Unit vector, or zero for a zero-length input.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

#[inline]
pub fn circle_circle_intersects(a: &Circle, b: &Circle) -> bool {
    distance(a.center, b.center) < a.radius + b.radius
}

#[inline]
pub fn circle_rect_intersects(circle: &Circle, rect: &Aabb) -> bool {
    let closest = rect.closest_point(circle.center);
    circle.center.distance_squared(closest) < circle.radius * circle.radius
}

#[inline]
pub fn rect_rect_intersects(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps(b)
}

/// Unit vector from `from` toward `to`, [`FALLBACK_NORMAL`] when they coincide.
#[inline]
pub fn collision_normal(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist == 0.0 {
        FALLBACK_NORMAL
    } else {
        delta / dist
    }
}

/// Overlap depth of two circles. Negative when separated.
#[inline]
pub fn circle_penetration(a: &Circle, b: &Circle) -> f32 {
    (a.radius + b.radius) - distance(a.center, b.center)
}

/// Cast the segment `p0 -> p1` against a circle.
///
/// Returns the entry point (the smaller quadratic root). A segment starting
/// inside the circle has a negative entry root and reports no hit.
pub fn ray_circle_intersect(p0: Vec2, p1: Vec2, circle: &Circle) -> Option<RayIntersection> {
    let d = p1 - p0;
    let f = p0 - circle.center;

    let a = d.dot(d);
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - circle.radius * circle.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let point = p0 + d * t;
    let normal = (point - circle.center) / circle.radius;
    Some(RayIntersection { point, normal })
}

/// Cast the segment `p0 -> p1` against a rectangle using the slab method.
///
/// An axis along which the segment does not move is handled by checking
/// that the segment lies within the slab (edges inclusive) instead of
/// dividing by zero.
pub fn ray_rect_intersect(p0: Vec2, p1: Vec2, rect: &Aabb) -> Option<RayIntersection> {
    let d = p1 - p0;
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (origin, delta, lo, hi) = (p0[axis], d[axis], rect.min[axis], rect.max[axis]);

        if delta.abs() < PARALLEL_EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let t1 = (lo - origin) / delta;
        let t2 = (hi - origin) / delta;
        let (t_min, t_max) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

        if t_min > t_near {
            t_near = t_min;
            normal = Vec2::ZERO;
            normal[axis] = if t1 < t2 { -1.0 } else { 1.0 };
        }
        t_far = t_far.min(t_max);

        if t_near > t_far {
            return None;
        }
    }

    if !(0.0..=1.0).contains(&t_near) {
        return None;
    }

    Some(RayIntersection {
        point: p0 + d * t_near,
        normal,
    })
}
