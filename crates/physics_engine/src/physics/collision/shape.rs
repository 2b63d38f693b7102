//! Collision volume geometry
//!
//! Volumes are stored in body-local terms (a radius, a local normal, box
//! half-extents) and turned into a [`WorldVolume`] on demand for testing,
//! using the body's position for this step.

use serde::{Serialize, Deserialize};

use crate::foundation::math::{constants, utils, PlaneAxis, Quat, Vec3};
use crate::physics::PhysicsError;
use super::hull;

/// Shape tag with a fixed ordinal ranking
///
/// The ranking is the row/column order of the collision dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Solid sphere
    Sphere = 0,
    /// Infinite two-sided plane
    Plane = 1,
    /// Infinite one-sided halfspace
    Halfspace = 2,
    /// Axis-aligned box
    Aabb = 3,
}

impl ShapeKind {
    /// Number of shape kinds
    pub const COUNT: usize = 4;

    /// All kinds in rank order
    pub const ALL: [Self; Self::COUNT] = [Self::Sphere, Self::Plane, Self::Halfspace, Self::Aabb];

    /// Dispatch ordinal
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// Whether the shape has unbounded extent
    pub const fn is_infinite(self) -> bool {
        matches!(self, Self::Plane | Self::Halfspace)
    }

    /// Display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sphere => "Sphere",
            Self::Plane => "Plane",
            Self::Halfspace => "Halfspace",
            Self::Aabb => "Aabb",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Collision volume (body-local)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionVolume {
    /// Sphere centred on the body
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Two-sided plane through the body position
    Plane {
        /// Surface normal before the body rotation is applied
        normal: Vec3,
    },
    /// Halfspace whose surface passes through the body position
    ///
    /// Everything on the negative side of the normal is solid.
    Halfspace {
        /// Outward normal before the body rotation is applied
        normal: Vec3,
    },
    /// Axis-aligned box centred on the body
    Aabb {
        /// Half-size along each world axis
        half_extents: Vec3,
    },
}

impl CollisionVolume {
    /// Shape tag
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Plane { .. } => ShapeKind::Plane,
            Self::Halfspace { .. } => ShapeKind::Halfspace,
            Self::Aabb { .. } => ShapeKind::Aabb,
        }
    }

    /// Whether the volume has unbounded extent
    pub const fn is_infinite(&self) -> bool {
        self.kind().is_infinite()
    }

    /// Reject degenerate parameters
    pub fn validate(&self) -> Result<(), PhysicsError> {
        match *self {
            Self::Sphere { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(PhysicsError::InvalidShape(format!(
                        "sphere radius must be positive, got {radius}"
                    )));
                }
            }
            Self::Plane { normal } | Self::Halfspace { normal } => {
                if utils::try_normalize(normal).is_none() {
                    return Err(PhysicsError::InvalidShape(format!(
                        "{} normal must be non-zero, got {normal:?}",
                        self.kind()
                    )));
                }
            }
            Self::Aabb { half_extents } => {
                if !half_extents.iter().all(|h| h.is_finite() && *h > 0.0) {
                    return Err(PhysicsError::InvalidShape(format!(
                        "box half extents must be positive, got {half_extents:?}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Enclosed volume; infinite shapes report 1
    pub fn volume(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3),
            Self::Plane { .. } | Self::Halfspace { .. } => 1.0,
            Self::Aabb { half_extents } => 8.0 * half_extents.x * half_extents.y * half_extents.z,
        }
    }

    /// Radius of a sphere around the body position enclosing the volume
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Plane { .. } | Self::Halfspace { .. } => f32::INFINITY,
            Self::Aabb { half_extents } => half_extents.magnitude(),
        }
    }

    /// Area presented to a flow moving along `direction`
    ///
    /// Infinite shapes report 1 since a true area is meaningless for drag.
    /// A degenerate direction falls back to world up.
    pub fn cross_section(&self, direction: Vec3) -> f32 {
        match *self {
            Self::Sphere { radius } => std::f32::consts::PI * radius * radius,
            Self::Plane { .. } | Self::Halfspace { .. } => 1.0,
            Self::Aabb { half_extents } => {
                let axis = PlaneAxis::new(utils::normalize_or(direction, Vec3::from(constants::UP)));
                let projected: Vec<_> = box_corners(Vec3::zeros(), half_extents)
                    .iter()
                    .map(|corner| axis.project(*corner))
                    .collect();
                hull::polygon_area(&hull::convex_hull(&projected))
            }
        }
    }

    /// Place the volume in the world for this step
    pub fn to_world(&self, position: Vec3, rotation: &Quat) -> WorldVolume {
        match *self {
            Self::Sphere { radius } => WorldVolume::Sphere { center: position, radius },
            Self::Plane { normal } => WorldVolume::Plane(PlaneAxis::with_origin(rotation * normal, position)),
            Self::Halfspace { normal } => {
                WorldVolume::Halfspace(PlaneAxis::with_origin(rotation * normal, position))
            }
            // Boxes stay axis-aligned regardless of body rotation
            Self::Aabb { half_extents } => WorldVolume::Aabb { center: position, half_extents },
        }
    }
}

/// The 8 corners of an axis-aligned box
pub fn box_corners(center: Vec3, half_extents: Vec3) -> [Vec3; 8] {
    let h = half_extents;
    [
        center + Vec3::new(-h.x, -h.y, -h.z),
        center + Vec3::new(h.x, -h.y, -h.z),
        center + Vec3::new(-h.x, h.y, -h.z),
        center + Vec3::new(h.x, h.y, -h.z),
        center + Vec3::new(-h.x, -h.y, h.z),
        center + Vec3::new(h.x, -h.y, h.z),
        center + Vec3::new(-h.x, h.y, h.z),
        center + Vec3::new(h.x, h.y, h.z),
    ]
}

/// World-space volume (temporary, for testing only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldVolume {
    /// World-space sphere
    Sphere {
        /// Centre
        center: Vec3,
        /// Radius
        radius: f32,
    },
    /// World-space plane frame
    Plane(PlaneAxis),
    /// World-space halfspace frame
    Halfspace(PlaneAxis),
    /// World-space box
    Aabb {
        /// Centre
        center: Vec3,
        /// Half-size along each axis
        half_extents: Vec3,
    },
}

impl WorldVolume {
    /// Shape tag
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Plane(_) => ShapeKind::Plane,
            Self::Halfspace(_) => ShapeKind::Halfspace,
            Self::Aabb { .. } => ShapeKind::Aabb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rank_order() {
        let ranks: Vec<_> = ShapeKind::ALL.iter().map(|k| k.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        assert!(ShapeKind::Plane.is_infinite());
        assert!(!ShapeKind::Aabb.is_infinite());
    }

    #[test]
    fn test_validate_rejects_degenerate_shapes() {
        assert!(CollisionVolume::Sphere { radius: 0.0 }.validate().is_err());
        assert!(CollisionVolume::Plane { normal: Vec3::zeros() }.validate().is_err());
        assert!(CollisionVolume::Aabb { half_extents: Vec3::new(1.0, 0.0, 1.0) }.validate().is_err());
        assert!(CollisionVolume::Halfspace { normal: Vec3::y() }.validate().is_ok());
    }

    #[test]
    fn test_volumes() {
        let sphere = CollisionVolume::Sphere { radius: 1.0 };
        assert_relative_eq!(sphere.volume(), 4.18879, epsilon = 1e-4);
        let cube = CollisionVolume::Aabb { half_extents: Vec3::new(0.5, 1.0, 2.0) };
        assert_relative_eq!(cube.volume(), 8.0);
        assert_eq!(CollisionVolume::Plane { normal: Vec3::y() }.volume(), 1.0);
    }

    #[test]
    fn test_box_cross_section_face_on() {
        let cube = CollisionVolume::Aabb { half_extents: Vec3::new(1.0, 2.0, 3.0) };
        // Looking down y sees the x-z face
        assert_relative_eq!(cube.cross_section(Vec3::y()), 2.0 * 6.0, epsilon = 1e-4);
        assert_relative_eq!(cube.cross_section(-Vec3::x()), 4.0 * 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_box_cross_section_diagonal_is_larger() {
        let cube = CollisionVolume::Aabb { half_extents: Vec3::new(0.5, 0.5, 0.5) };
        let face = cube.cross_section(Vec3::z());
        let diagonal = cube.cross_section(Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(face, 1.0, epsilon = 1e-4);
        // Regular hexagon of a unit cube viewed along its diagonal: sqrt(3)
        assert_relative_eq!(diagonal, 3.0_f32.sqrt(), epsilon = 1e-3);
    }

    #[test]
    fn test_plane_to_world_applies_rotation() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2);
        let plane = CollisionVolume::Plane { normal: Vec3::y() };
        match plane.to_world(Vec3::new(0.0, 1.0, 0.0), &rotation) {
            WorldVolume::Plane(axis) => {
                assert_relative_eq!(axis.normal, -Vec3::x(), epsilon = 1e-5);
                assert_relative_eq!(axis.origin, Vec3::new(0.0, 1.0, 0.0));
            }
            other => panic!("expected plane, got {other:?}"),
        }
    }

    #[test]
    fn test_corners_span_box() {
        let corners = box_corners(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let min_x = corners.iter().map(|c| c.x).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.x).fold(f32::NEG_INFINITY, f32::max);
        assert_eq!((min_x, max_x), (0.0, 2.0));
    }
}
