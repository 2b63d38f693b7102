//! Contact records
//!
//! One record per overlapping pair, kept across steps while the overlap
//! lasts so a resting contact can be told apart from a fresh impact.

use crate::foundation::math::Vec3;
use crate::physics::BodyHandle;

/// Unordered pair identity (larger handle stored first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactKey {
    /// Larger handle
    pub first: BodyHandle,
    /// Smaller handle
    pub second: BodyHandle,
}

impl ContactKey {
    /// Create a key; argument order does not matter
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        if a >= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Whether `handle` is one of the pair
    pub fn involves(&self, handle: BodyHandle) -> bool {
        self.first == handle || self.second == handle
    }
}

/// Lifecycle of a contact pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// First step of overlap: restitution impulse applies
    New,
    /// Overlap continued from an earlier step: normal velocity is cancelled
    /// and friction applies
    Persistent,
}

/// Data describing one active collision
///
/// `normal` is unit length and points from `other` toward `focused`.
/// `relative_velocity` is `other.velocity - focused.velocity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactRecord {
    /// Body the normal points toward
    pub focused: BodyHandle,
    /// Body the normal points away from
    pub other: BodyHandle,
    /// Velocity of `other` relative to `focused`
    pub relative_velocity: Vec3,
    /// Representative point of contact
    pub contact_point: Vec3,
    /// Unit normal from `other` toward `focused`
    pub normal: Vec3,
    /// Overlap along the normal
    pub penetration_depth: f32,
    /// Seconds since this overlap began
    pub time_since_start: f32,
    /// Set once the resolver has processed the record this step
    pub resolved: bool,
}

impl ContactRecord {
    /// Empty record for a pair
    pub fn new(focused: BodyHandle, other: BodyHandle) -> Self {
        Self {
            focused,
            other,
            relative_velocity: Vec3::zeros(),
            contact_point: Vec3::zeros(),
            normal: Vec3::y(),
            penetration_depth: 0.0,
            time_since_start: 0.0,
            resolved: false,
        }
    }

    /// Unordered pair identity
    pub fn key(&self) -> ContactKey {
        ContactKey::new(self.focused, self.other)
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> ContactPhase {
        if self.time_since_start > 0.0 {
            ContactPhase::Persistent
        } else {
            ContactPhase::New
        }
    }

    /// Exchange the roles of the two bodies
    ///
    /// Normal and relative velocity are negated so the record stays
    /// consistent with its new orientation.
    pub fn swap_roles(&mut self) {
        std::mem::swap(&mut self.focused, &mut self.other);
        self.normal = -self.normal;
        self.relative_velocity = -self.relative_velocity;
    }
}
