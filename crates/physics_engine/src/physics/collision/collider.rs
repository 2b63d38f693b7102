//! Colliders: a collision volume plus its surface and per-step state
//!
//! The collider carries everything the broad and narrow phases need besides
//! the body transform: material, skin width, response mode, and the
//! "theoretical" position the body would reach this step before collision
//! correction is applied.

use serde::{Serialize, Deserialize};

use crate::foundation::math::{PlaneAxis, Quat, Vec3};
use crate::physics::PhysicsMaterial;
use super::shape::{CollisionVolume, ShapeKind, WorldVolume};

/// Default decoupling margin kept between resting surfaces
pub const DEFAULT_SKIN_WIDTH: f32 = 0.03;

/// How a movable collider's normal velocity responds to an impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VelocityMode {
    /// Perfect bounce: restitution 1
    Reflect,
    /// Kill the normal velocity: restitution 0
    ZeroOnImpact,
    /// Use the material restitution
    #[default]
    Restitution,
}

/// Collision volume attached to a rigid body
#[derive(Debug, Clone)]
pub struct Collider {
    volume: CollisionVolume,
    material: PhysicsMaterial,
    skin_width: f32,
    kinematic: bool,
    velocity_mode: VelocityMode,

    // Per-step state
    theoretical_position: Vec3,
    displacement: Vec3,

    // Lazily refreshed frame of infinite shapes
    plane_axis: Option<PlaneAxis>,
    last_position: Option<Vec3>,
    last_rotation: Option<Quat>,
}

impl Collider {
    /// Wrap a volume with default material and skin width
    ///
    /// Finite volumes are kinematic by default; infinite ones never are.
    pub fn new(volume: CollisionVolume) -> Self {
        Self {
            volume,
            material: PhysicsMaterial::default(),
            skin_width: DEFAULT_SKIN_WIDTH,
            kinematic: !volume.is_infinite(),
            velocity_mode: VelocityMode::default(),
            theoretical_position: Vec3::zeros(),
            displacement: Vec3::zeros(),
            plane_axis: None,
            last_position: None,
            last_rotation: None,
        }
    }

    /// Sphere collider
    pub fn sphere(radius: f32) -> Self {
        Self::new(CollisionVolume::Sphere { radius })
    }

    /// Two-sided plane collider
    pub fn plane(normal: Vec3) -> Self {
        Self::new(CollisionVolume::Plane { normal })
    }

    /// Halfspace collider (solid below the surface)
    pub fn halfspace(normal: Vec3) -> Self {
        Self::new(CollisionVolume::Halfspace { normal })
    }

    /// Axis-aligned box collider
    pub fn aabb(half_extents: Vec3) -> Self {
        Self::new(CollisionVolume::Aabb { half_extents })
    }

    /// Set the surface material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Set the skin width (negative values clamp to zero)
    pub fn with_skin_width(mut self, skin_width: f32) -> Self {
        self.skin_width = skin_width.max(0.0);
        self
    }

    /// Allow or forbid the collider to be moved by collisions
    ///
    /// Has no effect on infinite volumes.
    pub fn with_kinematic(mut self, kinematic: bool) -> Self {
        self.kinematic = kinematic && !self.volume.is_infinite();
        self
    }

    /// Set the impact response mode
    pub fn with_velocity_mode(mut self, mode: VelocityMode) -> Self {
        self.velocity_mode = mode;
        self
    }

    /// Collision volume
    pub fn volume(&self) -> &CollisionVolume {
        &self.volume
    }

    /// Shape tag
    pub fn kind(&self) -> ShapeKind {
        self.volume.kind()
    }

    /// Surface material
    pub fn material(&self) -> &PhysicsMaterial {
        &self.material
    }

    /// Skin width
    pub fn skin_width(&self) -> f32 {
        self.skin_width
    }

    /// Whether collisions may move this collider
    pub fn is_kinematic(&self) -> bool {
        self.kinematic && !self.volume.is_infinite()
    }

    /// Impact response mode
    pub fn velocity_mode(&self) -> VelocityMode {
        self.velocity_mode
    }

    /// Restitution this collider contributes to a contact
    pub fn restitution(&self) -> f32 {
        if self.volume.is_infinite() {
            return self.material.restitution;
        }
        match self.velocity_mode {
            VelocityMode::Reflect => 1.0,
            VelocityMode::ZeroOnImpact => 0.0,
            VelocityMode::Restitution => self.material.restitution,
        }
    }

    /// Position the body would reach this step without collisions
    pub fn theoretical_position(&self) -> Vec3 {
        self.theoretical_position
    }

    /// Positional correction accumulated this step
    pub fn displacement(&self) -> Vec3 {
        self.displacement
    }

    pub(crate) fn begin_step(&mut self, theoretical_position: Vec3) {
        self.theoretical_position = theoretical_position;
        self.displacement = Vec3::zeros();
    }

    pub(crate) fn add_displacement(&mut self, correction: Vec3) {
        self.displacement += correction;
    }

    /// Rebuild the plane frame if the transform moved since the last refresh
    ///
    /// Returns `true` when a rebuild happened. Finite volumes have no frame
    /// and always return `false`.
    pub fn refresh_axis(&mut self, position: Vec3, rotation: &Quat) -> bool {
        let normal = match self.volume {
            CollisionVolume::Plane { normal } | CollisionVolume::Halfspace { normal } => normal,
            CollisionVolume::Sphere { .. } | CollisionVolume::Aabb { .. } => return false,
        };

        if self.plane_axis.is_some()
            && self.last_position == Some(position)
            && self.last_rotation.as_ref() == Some(rotation)
        {
            return false;
        }

        self.plane_axis = Some(PlaneAxis::with_origin(rotation * normal, position));
        self.last_position = Some(position);
        self.last_rotation = Some(*rotation);
        true
    }

    /// Cached plane frame of an infinite volume
    pub fn plane_axis(&self) -> Option<&PlaneAxis> {
        self.plane_axis.as_ref()
    }

    /// World-space volume at the theoretical position
    pub fn world_volume(&self, rotation: &Quat) -> WorldVolume {
        match (self.volume, self.plane_axis) {
            (CollisionVolume::Plane { .. }, Some(axis)) => WorldVolume::Plane(axis),
            (CollisionVolume::Halfspace { .. }, Some(axis)) => WorldVolume::Halfspace(axis),
            (volume, _) => volume.to_world(self.theoretical_position, rotation),
        }
    }
}
