//! Single-pass contact resolution: positional split plus one impulse.
//!
//! Contacts are resolved once each, in detection order. Clusters of several
//! simultaneous contacts may keep some overlap after a step.

use glam::Vec2;
use tracing::trace;

use super::body::Body;
use super::body_set::BodySet;
use super::contact::Contact;

/// Resolve every contact against the current body state.
pub fn solve_contacts(contacts: &[Contact], bodies: &mut BodySet, elasticity: f32) {
    for contact in contacts {
        let Some((a, b)) = bodies.get_pair_mut(contact.body_a, contact.body_b) else {
            continue;
        };
        separate(a, b, contact.normal, contact.depth);
        exchange_impulse(a, b, contact.normal, elasticity);
    }
}

/// Push each movable body half the depth apart along the normal.
fn separate(a: &mut Body, b: &mut Body, normal: Vec2, depth: f32) {
    let separation = normal * depth * 0.5;
    if a.is_dynamic() {
        a.position -= separation;
    }
    if b.is_dynamic() {
        b.position += separation;
    }
}

/// Impulse along the normal between two dynamic bodies.
///
/// Bodies already moving apart are left alone.
fn exchange_impulse(a: &mut Body, b: &mut Body, normal: Vec2, elasticity: f32) {
    if !(a.is_dynamic() && b.is_dynamic()) {
        return;
    }

    let inv_mass_sum = a.inverse_mass() + b.inverse_mass();
    if inv_mass_sum <= 0.0 {
        return;
    }

    let velocity_along_normal = (b.velocity - a.velocity).dot(normal);
    if velocity_along_normal > 0.0 {
        return;
    }

    let restitution = a
        .restitution_or(elasticity)
        .min(b.restitution_or(elasticity));

    let j = -(1.0 + restitution) * velocity_along_normal / inv_mass_sum;
    let impulse = normal * j;

    trace!(j, restitution, "contact impulse");

    a.velocity -= impulse * a.inverse_mass();
    b.velocity += impulse * b.inverse_mass();
}
