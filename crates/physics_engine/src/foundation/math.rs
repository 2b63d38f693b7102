//! Math utilities and types
//!
//! Provides the fundamental math types used by the physics engine, plus the
//! plane-axis frame used by infinite surfaces and cross-section projection.

pub use nalgebra::{
    Vector2, Vector3,
    Quaternion,
    Unit,
};
use serde::{Serialize, Deserialize};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Lengths below this are treated as zero when normalizing
    pub const NORMALIZE_EPSILON: f32 = 1.0e-6;

    /// World up axis
    pub const UP: [f32; 3] = [0.0, 1.0, 0.0];

    /// World forward axis
    pub const FORWARD: [f32; 3] = [0.0, 0.0, 1.0];
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Normalize `v`, returning `None` for zero-length or non-finite input
    pub fn try_normalize(v: Vec3) -> Option<Vec3> {
        if !is_finite(v) {
            return None;
        }
        v.try_normalize(constants::NORMALIZE_EPSILON)
    }

    /// Normalize `v`, falling back to `fallback` when `v` is degenerate
    pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
        try_normalize(v).unwrap_or(fallback)
    }

    /// Check that every component is finite
    pub fn is_finite(v: Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    /// Clamp a NaN/Inf vector to zero
    ///
    /// Returns the (possibly clamped) vector and whether clamping happened.
    pub fn sanitize(v: Vec3) -> (Vec3, bool) {
        if is_finite(v) {
            (v, false)
        } else {
            (Vec3::zeros(), true)
        }
    }

    /// Component of `v` along the unit vector `n`
    pub fn project_onto(v: Vec3, n: Vec3) -> Vec3 {
        n * v.dot(&n)
    }

    /// Component of `v` perpendicular to the unit vector `n`
    pub fn reject_from(v: Vec3, n: Vec3) -> Vec3 {
        v - project_onto(v, n)
    }

    /// Floor-divide each component, giving the integer cell coordinate
    ///
    /// Ratios beyond the `i64` range saturate.
    pub fn floor_div(p: Vec3, size: Vec3) -> [i64; 3] {
        [
            (p.x / size.x).floor() as i64,
            (p.y / size.y).floor() as i64,
            (p.z / size.z).floor() as i64,
        ]
    }
}

/// Orthonormal frame of an infinite plane
///
/// `normal`, `tangent` and `bitangent` are mutually orthonormal. The tangent
/// pair is derived from the normal alone, so two axes built from the same
/// normal are identical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneAxis {
    /// Unit surface normal
    pub normal: Vec3,
    /// First in-plane unit axis
    pub tangent: Vec3,
    /// Second in-plane unit axis (`normal × tangent`)
    pub bitangent: Vec3,
    /// A point on the plane
    pub origin: Vec3,
}

impl PlaneAxis {
    /// Build a frame from a normal through the world origin
    ///
    /// A degenerate normal falls back to world up.
    pub fn new(normal: Vec3) -> Self {
        Self::with_origin(normal, Vec3::zeros())
    }

    /// Build a frame from a normal through `origin`
    pub fn with_origin(normal: Vec3, origin: Vec3) -> Self {
        let normal = utils::normalize_or(normal, Vec3::from(constants::UP));
        let tangent = Self::tangent_for(normal);
        let bitangent = normal.cross(&tangent).normalize();
        Self { normal, tangent, bitangent, origin }
    }

    /// Build the frame of a surface whose local up axis is rotated by `rotation`
    pub fn from_transform(position: Vec3, rotation: &Quat) -> Self {
        Self::with_origin(rotation * Vec3::from(constants::UP), position)
    }

    // Helper axis: forward when the normal is mostly vertical, up otherwise.
    fn tangent_for(normal: Vec3) -> Vec3 {
        let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
        let helper = if ay > ax && ay > az {
            Vec3::from(constants::FORWARD)
        } else {
            Vec3::from(constants::UP)
        };
        utils::normalize_or(normal.cross(&helper), Vec3::x())
    }

    /// Signed distance of `point` above the plane (positive on the normal side)
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(&(point - self.origin))
    }

    /// Closest point on the plane to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Project a point into the plane's 2D (tangent, bitangent) coordinates
    pub fn project(&self, point: Vec3) -> Vec2 {
        Vec2::new(point.dot(&self.tangent), point.dot(&self.bitangent))
    }

    /// Map 2D plane coordinates back to world space around `world_position`
    pub fn to_world_space(&self, world_position: Vec3, projected: Vec2) -> Vec3 {
        world_position + self.tangent * projected.x + self.bitangent * projected.y
    }
}

impl Default for PlaneAxis {
    fn default() -> Self {
        Self::new(Vec3::from(constants::UP))
    }
}
