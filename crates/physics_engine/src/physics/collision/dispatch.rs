//! Collision dispatch table
//!
//! A triangular table of detector functions indexed by shape rank. Row `i`
//! holds the detectors for `(i, j)` with `j >= i` at column `j - i`, so
//! every pair of shapes is implemented exactly once. Calls with the
//! higher-ranked shape first are swapped before lookup and the resulting
//! record is flipped back. Two shapes of the same kind run with the larger
//! handle first, so both call orders see the same detector input.

use std::cmp::Ordering;

use super::contact::ContactRecord;
use super::narrow::{self, VolumeState};
use super::shape::ShapeKind;

/// Narrow-phase detector signature
pub type DetectFn = fn(&VolumeState, &VolumeState, &mut ContactRecord) -> bool;

struct Entry {
    detect: DetectFn,
    registered: bool,
}

/// Shape-pair dispatch table
pub struct CollisionTable {
    rows: Vec<Vec<Entry>>,
}

impl CollisionTable {
    /// Build the table with every built-in detector registered
    ///
    /// Pairs left without a detector are logged once here.
    pub fn new() -> Self {
        let mut table = Self::empty();

        table.register(ShapeKind::Sphere, ShapeKind::Sphere, narrow::sphere_sphere);
        table.register(ShapeKind::Sphere, ShapeKind::Plane, narrow::sphere_plane);
        table.register(ShapeKind::Sphere, ShapeKind::Halfspace, narrow::sphere_halfspace);
        table.register(ShapeKind::Sphere, ShapeKind::Aabb, narrow::sphere_aabb);
        table.register(ShapeKind::Plane, ShapeKind::Aabb, narrow::plane_aabb);
        table.register(ShapeKind::Halfspace, ShapeKind::Aabb, narrow::halfspace_aabb);
        table.register(ShapeKind::Aabb, ShapeKind::Aabb, narrow::aabb_aabb);

        let missing = table.missing_pairs();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(|(a, b)| format!("{a}-{b}")).collect();
            log::warn!("CollisionTable: no detector for {}; these pairs never collide", names.join(", "));
        }

        table
    }

    /// Table where every pair resolves to "not colliding"
    pub fn empty() -> Self {
        let rows = (0..ShapeKind::COUNT)
            .map(|i| {
                (i..ShapeKind::COUNT)
                    .map(|_| Entry { detect: narrow::no_collision, registered: false })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    fn slot(a: ShapeKind, b: ShapeKind) -> (usize, usize) {
        let (i, j) = if a.rank() <= b.rank() { (a.rank(), b.rank()) } else { (b.rank(), a.rank()) };
        (i, j - i)
    }

    /// Register (or replace) the detector for a pair
    ///
    /// `detect` must expect the lower-ranked shape as its first argument;
    /// the order of `a` and `b` here does not matter.
    pub fn register(&mut self, a: ShapeKind, b: ShapeKind, detect: DetectFn) {
        let (row, column) = Self::slot(a, b);
        self.rows[row][column] = Entry { detect, registered: true };
    }

    /// Whether a real detector exists for the pair (in either order)
    pub fn is_registered(&self, a: ShapeKind, b: ShapeKind) -> bool {
        let (row, column) = Self::slot(a, b);
        self.rows[row][column].registered
    }

    /// Pairs that fall back to "not colliding", in rank order
    pub fn missing_pairs(&self) -> Vec<(ShapeKind, ShapeKind)> {
        let mut missing = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            for (offset, entry) in row.iter().enumerate() {
                if !entry.registered {
                    missing.push((ShapeKind::ALL[i], ShapeKind::ALL[i + offset]));
                }
            }
        }
        missing
    }

    /// Test a pair in any order
    ///
    /// On `true`, `record` names `a` as focused and `b` as other, and its
    /// normal points from `b` toward `a`.
    pub fn is_colliding(&self, a: &VolumeState, b: &VolumeState, record: &mut ContactRecord) -> bool {
        let (kind_a, kind_b) = (a.volume.kind(), b.volume.kind());
        let (row, column) = Self::slot(kind_a, kind_b);
        let detect = self.rows[row][column].detect;

        let in_order = match kind_a.rank().cmp(&kind_b.rank()) {
            Ordering::Less => true,
            Ordering::Equal => a.handle >= b.handle,
            Ordering::Greater => false,
        };

        if in_order {
            record.focused = a.handle;
            record.other = b.handle;
            detect(a, b, record)
        } else {
            record.focused = b.handle;
            record.other = a.handle;
            let colliding = detect(b, a, record);
            record.swap_roles();
            colliding
        }
    }
}

impl Default for CollisionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{PlaneAxis, Vec3};
    use crate::physics::collision::WorldVolume;
    use crate::physics::BodyHandle;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn sample(handle: BodyHandle, kind: ShapeKind, offset: Vec3) -> VolumeState {
        let volume = match kind {
            ShapeKind::Sphere => WorldVolume::Sphere { center: offset, radius: 0.6 },
            ShapeKind::Plane => WorldVolume::Plane(PlaneAxis::with_origin(Vec3::y(), offset)),
            ShapeKind::Halfspace => WorldVolume::Halfspace(PlaneAxis::with_origin(Vec3::y(), offset)),
            ShapeKind::Aabb => WorldVolume::Aabb { center: offset, half_extents: Vec3::repeat(0.5) },
        };
        VolumeState { handle, volume, velocity: offset * 0.5 }
    }

    #[test]
    fn test_missing_pairs_are_infinite_only() {
        let table = CollisionTable::new();
        assert_eq!(
            table.missing_pairs(),
            vec![
                (ShapeKind::Plane, ShapeKind::Plane),
                (ShapeKind::Plane, ShapeKind::Halfspace),
                (ShapeKind::Halfspace, ShapeKind::Halfspace),
            ]
        );
        assert!(table.is_registered(ShapeKind::Aabb, ShapeKind::Sphere));
        assert!(!table.is_registered(ShapeKind::Halfspace, ShapeKind::Plane));
    }

    #[test]
    fn test_empty_table_never_collides() {
        let mut map: SlotMap<BodyHandle, ()> = SlotMap::with_key();
        let (a, b) = (map.insert(()), map.insert(()));
        let table = CollisionTable::empty();
        let mut record = ContactRecord::new(a, b);
        let first = sample(a, ShapeKind::Sphere, Vec3::zeros());
        let second = sample(b, ShapeKind::Sphere, Vec3::zeros());
        assert!(!table.is_colliding(&first, &second, &mut record));
        assert_eq!(table.missing_pairs().len(), 10);
    }

    #[test]
    fn test_dispatch_is_symmetric_for_every_pair() {
        let mut map: SlotMap<BodyHandle, ()> = SlotMap::with_key();
        let (a, b) = (map.insert(()), map.insert(()));
        let table = CollisionTable::new();

        let offsets = [
            Vec3::new(0.3, 0.4, 0.1),
            Vec3::new(0.0, 0.9, 0.0),
            Vec3::new(-0.2, -0.3, 0.4),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, 0.4),
        ];

        for kind_a in ShapeKind::ALL {
            for kind_b in ShapeKind::ALL {
                for offset in offsets {
                    let first = sample(a, kind_a, Vec3::zeros());
                    let second = sample(b, kind_b, offset);

                    let mut forward = ContactRecord::new(a, b);
                    let mut backward = ContactRecord::new(b, a);
                    let hit_forward = table.is_colliding(&first, &second, &mut forward);
                    let hit_backward = table.is_colliding(&second, &first, &mut backward);

                    assert_eq!(hit_forward, hit_backward, "{kind_a}-{kind_b} at {offset:?}");
                    if hit_forward {
                        assert_eq!((forward.focused, forward.other), (a, b));
                        assert_eq!((backward.focused, backward.other), (b, a));
                        assert_relative_eq!(forward.normal, -backward.normal, epsilon = 1e-6);
                        assert_relative_eq!(
                            forward.relative_velocity,
                            -backward.relative_velocity,
                            epsilon = 1e-6
                        );
                        assert_relative_eq!(
                            forward.penetration_depth,
                            backward.penetration_depth,
                            epsilon = 1e-6
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_kind_ties_flip_with_call_order() {
        let mut map: SlotMap<BodyHandle, ()> = SlotMap::with_key();
        let (a, b) = (map.insert(()), map.insert(()));
        let table = CollisionTable::new();

        let slab = |handle, center| VolumeState {
            handle,
            volume: WorldVolume::Aabb { center, half_extents: Vec3::new(0.2, 1.0, 1.0) },
            velocity: Vec3::zeros(),
        };
        let ball = |handle| VolumeState {
            handle,
            volume: WorldVolume::Sphere { center: Vec3::zeros(), radius: 0.5 },
            velocity: Vec3::zeros(),
        };

        // Least overlap on x with no offset along it
        let pairs = [
            (slab(a, Vec3::zeros()), slab(b, Vec3::new(0.0, 0.5, 0.0))),
            (ball(a), ball(b)),
        ];
        for (first, second) in pairs {
            let mut forward = ContactRecord::new(a, b);
            let mut backward = ContactRecord::new(b, a);
            assert!(table.is_colliding(&first, &second, &mut forward));
            assert!(table.is_colliding(&second, &first, &mut backward));
            assert_eq!(forward.focused, a);
            assert_eq!(backward.focused, b);
            assert_relative_eq!(forward.normal.magnitude(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(forward.normal, -backward.normal, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_swapped_call_points_normal_at_first_argument() {
        let mut map: SlotMap<BodyHandle, ()> = SlotMap::with_key();
        let (floor, ball) = (map.insert(()), map.insert(()));
        let table = CollisionTable::new();

        let plane = sample(floor, ShapeKind::Plane, Vec3::zeros());
        let sphere = sample(ball, ShapeKind::Sphere, Vec3::new(0.0, 0.5, 0.0));
        let mut record = ContactRecord::new(floor, ball);

        assert!(table.is_colliding(&plane, &sphere, &mut record));
        assert_eq!(record.focused, floor);
        // From the ball toward the plane
        assert_relative_eq!(record.normal, -Vec3::y());
    }
}
