//! Contact resolution
//!
//! Turns a detected contact into a positional correction and velocity
//! changes for the two bodies involved:
//!
//! 1. **Un-intersection**: push apart along the normal, leaving the skin
//!    width of overlap so resting contacts stay in contact.
//! 2. **Impulse**: on a new contact bounce with the pair's restitution; on a
//!    persistent one just cancel the approaching normal velocity.
//! 3. **Friction** (persistent contacts): stop slow sliding outright, damp
//!    faster sliding by the kinetic coefficient.
//!
//! Corrections and velocity changes are split between the bodies by inverse
//! mass, so an immovable partner takes none and the lighter body moves more.

use slotmap::SlotMap;

use crate::foundation::math::{utils, Vec3};
use crate::physics::collision::{ContactPhase, ContactRecord};
use crate::physics::{BodyHandle, RigidBody};

/// What resolving one contact did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// A normal impulse was applied
    pub impulse_applied: bool,
    /// A friction correction was applied
    pub friction_applied: bool,
    /// Non-finite vectors clamped to zero
    pub clamped: usize,
}

#[derive(Debug, Clone, Copy)]
struct Surface {
    skin_width: f32,
    restitution: f32,
    static_friction: f32,
    kinetic_friction: f32,
}

fn surface(body: &RigidBody) -> Option<Surface> {
    body.collider().map(|collider| Surface {
        skin_width: collider.skin_width(),
        restitution: collider.restitution(),
        static_friction: collider.material().static_friction,
        kinetic_friction: collider.material().kinetic_friction,
    })
}

// Clamp a non-finite delta to zero and count it
fn sanitized(delta: Vec3, outcome: &mut ResolveOutcome) -> Vec3 {
    let (delta, bad) = utils::sanitize(delta);
    if bad {
        outcome.clamped += 1;
    }
    delta
}

/// Resolve one contact in place
///
/// Relative velocity is re-read from the bodies, since earlier contacts this
/// step may already have changed it. Contacts between two immovable bodies,
/// or naming a missing body, are marked resolved without effect.
pub fn resolve_contact(
    record: &mut ContactRecord,
    bodies: &mut SlotMap<BodyHandle, RigidBody>,
) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();
    record.resolved = true;

    let Some([focused, other]) = bodies.get_disjoint_mut([record.focused, record.other]) else {
        return outcome;
    };
    let (Some(surface_f), Some(surface_o)) = (surface(focused), surface(other)) else {
        return outcome;
    };

    let inverse_f = focused.inverse_mass();
    let inverse_o = other.inverse_mass();
    let inverse_sum = inverse_f + inverse_o;
    if inverse_sum <= 0.0 {
        return outcome;
    }
    let weight_f = inverse_f / inverse_sum;
    let weight_o = inverse_o / inverse_sum;
    let normal = record.normal;

    // Un-intersection
    let skin = [(inverse_f, surface_f.skin_width), (inverse_o, surface_o.skin_width)]
        .iter()
        .filter(|(inverse, _)| *inverse > 0.0)
        .map(|(_, skin)| *skin)
        .fold(0.0_f32, f32::max);
    let correction = sanitized(normal * (record.penetration_depth - skin).max(0.0), &mut outcome);
    focused.add_displacement(correction * weight_f);
    other.add_displacement(-correction * weight_o);

    // Normal impulse while approaching
    let relative = other.velocity() - focused.velocity();
    record.relative_velocity = relative;
    let approach_speed = relative.dot(&normal);
    if approach_speed > 0.0 {
        let restitution = surface_f.restitution.min(surface_o.restitution);
        let magnitude = match record.phase() {
            ContactPhase::New => (1.0 + restitution) * approach_speed,
            ContactPhase::Persistent => approach_speed,
        };
        let delta = sanitized(normal * magnitude, &mut outcome);
        focused.add_velocity(delta * weight_f);
        other.add_velocity(-delta * weight_o);
        outcome.impulse_applied = true;

        log::trace!(
            "resolve: {:?} phase, approach {:.4}, restitution {:.2}",
            record.phase(),
            approach_speed,
            restitution
        );
    }

    // Friction
    if record.phase() == ContactPhase::Persistent {
        let relative = other.velocity() - focused.velocity();
        let tangential = utils::reject_from(relative, normal);
        let speed = tangential.magnitude();
        if speed > 0.0 {
            let static_threshold = 0.5 * (surface_f.static_friction + surface_o.static_friction);
            let removed = if speed <= static_threshold {
                tangential
            } else {
                let kinetic = (0.5 * (surface_f.kinetic_friction + surface_o.kinetic_friction)).clamp(0.0, 1.0);
                tangential * kinetic
            };
            let removed = sanitized(removed, &mut outcome);
            focused.add_velocity(removed * weight_f);
            other.add_velocity(-removed * weight_o);
            outcome.friction_applied = true;
        }
    }

    outcome.clamped += usize::from(focused.sanitize_velocity());
    outcome.clamped += usize::from(other.sanitize_velocity());
    outcome
}
