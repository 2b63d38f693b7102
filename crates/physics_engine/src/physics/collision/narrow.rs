//! Narrow-phase detectors
//!
//! One function per registered shape pair, always called with the
//! lower-ranked shape as `focused`. On overlap each fills the geometric
//! fields of the record and returns `true`; the normal points from `other`
//! toward `focused`.

use crate::foundation::math::{constants, utils, PlaneAxis, Vec3};
use crate::physics::BodyHandle;
use super::contact::ContactRecord;
use super::shape::WorldVolume;

/// One side of a candidate pair as seen by a detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeState {
    /// Owning body
    pub handle: BodyHandle,
    /// World-space volume for this step
    pub volume: WorldVolume,
    /// Body velocity
    pub velocity: Vec3,
}

fn fill(
    record: &mut ContactRecord,
    focused: &VolumeState,
    other: &VolumeState,
    normal: Vec3,
    depth: f32,
    contact_point: Vec3,
) -> bool {
    record.normal = normal;
    record.penetration_depth = depth.max(0.0);
    record.contact_point = contact_point;
    record.relative_velocity = other.velocity - focused.velocity;
    true
}

/// Fallback for pairs without a detector
pub fn no_collision(_focused: &VolumeState, _other: &VolumeState, _record: &mut ContactRecord) -> bool {
    false
}

/// Sphere against sphere
pub fn sphere_sphere(focused: &VolumeState, other: &VolumeState, record: &mut ContactRecord) -> bool {
    let (
        WorldVolume::Sphere { center: pf, radius: rf },
        WorldVolume::Sphere { center: po, radius: ro },
    ) = (focused.volume, other.volume)
    else {
        return false;
    };

    let delta = pf - po;
    let distance = delta.magnitude();
    let radius_sum = rf + ro;
    if distance > radius_sum {
        return false;
    }

    // Coincident centres: any direction separates them
    let normal = utils::normalize_or(delta, Vec3::from(constants::UP));
    fill(record, focused, other, normal, radius_sum - distance, po + normal * ro)
}

fn sphere_surface(
    focused: &VolumeState,
    other: &VolumeState,
    record: &mut ContactRecord,
    axis: &PlaneAxis,
    two_sided: bool,
) -> bool {
    let WorldVolume::Sphere { center, radius } = focused.volume else {
        return false;
    };

    let signed = axis.signed_distance(center);
    let (distance, normal) = if two_sided && signed < 0.0 {
        (-signed, -axis.normal)
    } else {
        (signed, axis.normal)
    };

    if distance > radius {
        return false;
    }
    fill(record, focused, other, normal, radius - distance, axis.closest_point(center))
}

/// Sphere against two-sided plane
pub fn sphere_plane(focused: &VolumeState, other: &VolumeState, record: &mut ContactRecord) -> bool {
    match other.volume {
        WorldVolume::Plane(axis) => sphere_surface(focused, other, record, &axis, true),
        _ => false,
    }
}

/// Sphere against halfspace
pub fn sphere_halfspace(focused: &VolumeState, other: &VolumeState, record: &mut ContactRecord) -> bool {
    match other.volume {
        WorldVolume::Halfspace(axis) => sphere_surface(focused, other, record, &axis, false),
        _ => false,
    }
}

/// Sphere against axis-aligned box
///
/// Overlap is measured to the closest point on the box, while the normal
/// runs from the box centre to the sphere centre. Coincident centres fall
/// back to the face of least penetration.
pub fn sphere_aabb(focused: &VolumeState, other: &VolumeState, record: &mut ContactRecord) -> bool {
    let (
        WorldVolume::Sphere { center, radius },
        WorldVolume::Aabb { center: box_center, half_extents },
    ) = (focused.volume, other.volume)
    else {
        return false;
    };

    let min = box_center - half_extents;
    let max = box_center + half_extents;
    let closest = Vec3::new(
        center.x.clamp(min.x, max.x),
        center.y.clamp(min.y, max.y),
        center.z.clamp(min.z, max.z),
    );

    let local = center - box_center;
    let outside = center - closest;
    let depth = if outside == Vec3::zeros() {
        // Centre inside (or on) the box
        let face_gap = (0..3)
            .map(|i| half_extents[i] - local[i].abs())
            .fold(f32::INFINITY, f32::min);
        radius + face_gap
    } else {
        let distance = outside.magnitude();
        if distance > radius {
            return false;
        }
        radius - distance
    };

    let normal = utils::try_normalize(local).unwrap_or_else(|| least_penetration_face(half_extents));
    fill(record, focused, other, normal, depth, closest)
}

// Outward normal of the face nearest the centre of a box
fn least_penetration_face(half_extents: Vec3) -> Vec3 {
    let mut axis = 0;
    for i in 1..3 {
        if half_extents[i] < half_extents[axis] {
            axis = i;
        }
    }
    let mut normal = Vec3::zeros();
    normal[axis] = 1.0;
    normal
}

// Extent of a box along a unit direction
fn projection_radius(half_extents: Vec3, normal: Vec3) -> f32 {
    half_extents.x * normal.x.abs() + half_extents.y * normal.y.abs() + half_extents.z * normal.z.abs()
}

fn surface_aabb(
    focused: &VolumeState,
    other: &VolumeState,
    record: &mut ContactRecord,
    axis: &PlaneAxis,
    two_sided: bool,
) -> bool {
    let WorldVolume::Aabb { center, half_extents } = other.volume else {
        return false;
    };

    let reach = projection_radius(half_extents, axis.normal);
    let signed = axis.signed_distance(center);
    let (distance, box_side) = if two_sided && signed < 0.0 {
        (-signed, -axis.normal)
    } else {
        (signed, axis.normal)
    };

    if distance > reach {
        return false;
    }
    // The box sits on `box_side`; the normal points from it back to the surface
    fill(record, focused, other, -box_side, reach - distance, axis.closest_point(center))
}

/// Two-sided plane against axis-aligned box
pub fn plane_aabb(focused: &VolumeState, other: &VolumeState, record: &mut ContactRecord) -> bool {
    match focused.volume {
        WorldVolume::Plane(axis) => surface_aabb(focused, other, record, &axis, true),
        _ => false,
    }
}

/// Halfspace against axis-aligned box
pub fn halfspace_aabb(focused: &VolumeState, other: &VolumeState, record: &mut ContactRecord) -> bool {
    match focused.volume {
        WorldVolume::Halfspace(axis) => surface_aabb(focused, other, record, &axis, false),
        _ => false,
    }
}

/// Axis-aligned box against axis-aligned box
///
/// Separating-axis test on the three world axes. The normal is the axis of
/// least overlap.
pub fn aabb_aabb(focused: &VolumeState, other: &VolumeState, record: &mut ContactRecord) -> bool {
    let (
        WorldVolume::Aabb { center: cf, half_extents: hf },
        WorldVolume::Aabb { center: co, half_extents: ho },
    ) = (focused.volume, other.volume)
    else {
        return false;
    };

    let delta = cf - co;
    let mut axis = 0;
    let mut depth = f32::INFINITY;
    for i in 0..3 {
        let overlap = hf[i] + ho[i] - delta[i].abs();
        if overlap < 0.0 {
            return false;
        }
        if overlap < depth {
            depth = overlap;
            axis = i;
        }
    }

    let mut normal = Vec3::zeros();
    normal[axis] = if delta[axis] < 0.0 { -1.0 } else { 1.0 };

    // Centre of the overlap region
    let lo = (cf - hf).sup(&(co - ho));
    let hi = (cf + hf).inf(&(co + ho));
    fill(record, focused, other, normal, depth, (lo + hi) * 0.5)
}
