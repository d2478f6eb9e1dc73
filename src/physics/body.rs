//! Body data: shape, mass and motion state.

use glam::Vec2;

/// Collision shape. Fixed for the lifetime of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Circle centered on the body position.
    Circle { radius: f32 },
    /// Axis-aligned rectangle whose top-left corner is the body position.
    Rect { width: f32, height: f32 },
}

/// Body mass. Infinite mass has zero inverse mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mass {
    Finite(f32),
    Infinite,
}

impl Mass {
    /// Inverse mass used by impulse exchange.
    #[inline]
    pub fn inverse(self) -> f32 {
        match self {
            Mass::Finite(m) => 1.0 / m,
            Mass::Infinite => 0.0,
        }
    }
}

/// How the engine treats a body during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Forces, integration and collision response all apply.
    Dynamic,
    /// Never moves.
    Static,
    /// Position comes from the network between ticks. Collides with local
    /// bodies but is never integrated or pushed.
    Remote,
}

/// Game-facing label. Has no influence on collision dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Generic,
    Player,
    Wall,
    Furniture,
    HidingSpot,
}

/// A physics body.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Cleared at the end of every step.
    pub acceleration: Vec2,
    pub mass: Mass,
    /// `None` defers to [`PhysicsConfig::elasticity`](super::PhysicsConfig).
    pub restitution: Option<f32>,
    pub body_type: BodyType,
    pub max_speed: Option<f32>,
    pub kind: BodyKind,
}

impl Body {
    pub(crate) fn new(shape: Shape, position: Vec2) -> Self {
        Self {
            shape,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: Mass::Finite(1.0),
            restitution: Some(0.3),
            body_type: BodyType::Dynamic,
            max_speed: None,
            kind: BodyKind::Generic,
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    /// Geometric center. Equal to `position` for circles.
    #[inline]
    pub fn center(&self) -> Vec2 {
        match self.shape {
            Shape::Circle { .. } => self.position,
            Shape::Rect { width, height } => self.position + Vec2::new(width, height) * 0.5,
        }
    }

    /// Inverse mass as seen by the solver: zero for anything not dynamic.
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.is_dynamic() {
            self.mass.inverse()
        } else {
            0.0
        }
    }

    /// Restitution with the engine-wide fallback applied.
    #[inline]
    pub fn restitution_or(&self, fallback: f32) -> f32 {
        self.restitution.unwrap_or(fallback)
    }
}
