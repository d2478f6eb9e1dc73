//! Canonical body variants.
//!
//! Every constructor layers three sources of values: the base defaults of
//! [`Body`], the variant defaults (player, wall, ...), and caller overrides.
//! Overrides always win. Construction is the only place where body
//! preconditions are checked; the engine trusts what it is given.

use glam::Vec2;

use crate::error::BodyError;

use super::body::{Body, BodyKind, BodyType, Mass, Shape};

/// Player mass.
const PLAYER_MASS: f32 = 2.0;
/// Player restitution.
const PLAYER_RESTITUTION: f32 = 0.2;
/// Player speed cap.
const PLAYER_MAX_SPEED: f32 = 5.0;

/// Optional field replacements applied on top of variant defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyOverrides {
    pub velocity: Option<Vec2>,
    pub acceleration: Option<Vec2>,
    pub mass: Option<Mass>,
    /// `Some(None)` clears restitution so the engine fallback is used.
    pub restitution: Option<Option<f32>>,
    pub body_type: Option<BodyType>,
    pub max_speed: Option<Option<f32>>,
    pub kind: Option<BodyKind>,
}

impl BodyOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = Some(Mass::Finite(mass));
        self
    }

    pub fn infinite_mass(mut self) -> Self {
        self.mass = Some(Mass::Infinite);
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = Some(Some(restitution));
        self
    }

    pub fn engine_restitution(mut self) -> Self {
        self.restitution = Some(None);
        self
    }

    pub fn body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    pub fn fixed(self) -> Self {
        self.body_type(BodyType::Static)
    }

    pub fn max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = Some(Some(max_speed));
        self
    }

    pub fn unlimited_speed(mut self) -> Self {
        self.max_speed = Some(None);
        self
    }

    pub fn kind(mut self, kind: BodyKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Fill every field left unset here from `fallback`.
    pub fn or(self, fallback: BodyOverrides) -> Self {
        Self {
            velocity: self.velocity.or(fallback.velocity),
            acceleration: self.acceleration.or(fallback.acceleration),
            mass: self.mass.or(fallback.mass),
            restitution: self.restitution.or(fallback.restitution),
            body_type: self.body_type.or(fallback.body_type),
            max_speed: self.max_speed.or(fallback.max_speed),
            kind: self.kind.or(fallback.kind),
        }
    }

    fn apply(self, body: &mut Body) {
        if let Some(v) = self.velocity {
            body.velocity = v;
        }
        if let Some(a) = self.acceleration {
            body.acceleration = a;
        }
        if let Some(m) = self.mass {
            body.mass = m;
        }
        if let Some(r) = self.restitution {
            body.restitution = r;
        }
        if let Some(t) = self.body_type {
            body.body_type = t;
        }
        if let Some(s) = self.max_speed {
            body.max_speed = s;
        }
        if let Some(k) = self.kind {
            body.kind = k;
        }
    }
}

/// Builds validated bodies.
pub struct BodyFactory;

impl BodyFactory {
    /// Circle centered at `(x, y)`.
    pub fn circle(x: f32, y: f32, radius: f32, overrides: BodyOverrides) -> Result<Body, BodyError> {
        check_dimension("radius", radius)?;
        build(Shape::Circle { radius }, x, y, overrides)
    }

    /// Rectangle with its top-left corner at `(x, y)`.
    pub fn rect(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        overrides: BodyOverrides,
    ) -> Result<Body, BodyError> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        build(Shape::Rect { width, height }, x, y, overrides)
    }

    /// Locally simulated player circle.
    pub fn player(x: f32, y: f32, size: f32, overrides: BodyOverrides) -> Result<Body, BodyError> {
        let defaults = BodyOverrides::new()
            .mass(PLAYER_MASS)
            .restitution(PLAYER_RESTITUTION)
            .max_speed(PLAYER_MAX_SPEED)
            .kind(BodyKind::Player);
        Self::circle(x, y, size, overrides.or(defaults))
    }

    /// Player circle whose motion is driven by network snapshots.
    pub fn remote_player(
        x: f32,
        y: f32,
        size: f32,
        overrides: BodyOverrides,
    ) -> Result<Body, BodyError> {
        Self::player(
            x,
            y,
            size,
            overrides.or(BodyOverrides::new().body_type(BodyType::Remote)),
        )
    }

    pub fn wall(x: f32, y: f32, width: f32, height: f32) -> Result<Body, BodyError> {
        Self::rect(x, y, width, height, immovable(BodyKind::Wall))
    }

    pub fn furniture(x: f32, y: f32, width: f32, height: f32) -> Result<Body, BodyError> {
        Self::rect(x, y, width, height, immovable(BodyKind::Furniture))
    }

    /// Static rectangle runners can hide in.
    pub fn hiding_spot(x: f32, y: f32, width: f32, height: f32) -> Result<Body, BodyError> {
        Self::rect(x, y, width, height, immovable(BodyKind::HidingSpot))
    }
}

fn immovable(kind: BodyKind) -> BodyOverrides {
    BodyOverrides::new().fixed().infinite_mass().kind(kind)
}

fn build(shape: Shape, x: f32, y: f32, overrides: BodyOverrides) -> Result<Body, BodyError> {
    let position = Vec2::new(x, y);
    if !position.is_finite() {
        return Err(BodyError::NonFinite("position"));
    }

    let mut body = Body::new(shape, position);
    overrides.apply(&mut body);
    validate(&body)?;
    Ok(body)
}

fn check_dimension(name: &'static str, value: f32) -> Result<(), BodyError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BodyError::InvalidDimension { name, value })
    }
}

fn validate(body: &Body) -> Result<(), BodyError> {
    if let Mass::Finite(m) = body.mass {
        if !(m.is_finite() && m > 0.0) {
            return Err(BodyError::InvalidMass(m));
        }
    }
    if let Some(r) = body.restitution {
        if !(0.0..=1.0).contains(&r) {
            return Err(BodyError::InvalidRestitution(r));
        }
    }
    if let Some(s) = body.max_speed {
        if !(s.is_finite() && s > 0.0) {
            return Err(BodyError::InvalidMaxSpeed(s));
        }
    }
    if !body.velocity.is_finite() {
        return Err(BodyError::NonFinite("velocity"));
    }
    if !body.acceleration.is_finite() {
        return Err(BodyError::NonFinite("acceleration"));
    }
    Ok(())
}
