//! Contact data structures for collision response.

use glam::Vec2;

use super::body_set::BodyHandle;

/// Normal and depth of one overlapping pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInfo {
    /// Unit normal from shape A to shape B.
    pub normal: Vec2,
    /// Penetration depth.
    pub depth: f32,
}

/// An overlap between two bodies, valid for a single step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Unit normal from A to B.
    pub normal: Vec2,
    pub depth: f32,
}
