//! Read-only views of the world for debug drawing

use crate::foundation::math::Vec3;
use crate::physics::{BodyHandle, ContactPhase, PhysicsWorld};
use crate::spatial::ChunkKey;

/// One contact from the last step
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSnapshot {
    /// Body the normal points at
    pub focused: BodyHandle,
    /// Partner body
    pub other: BodyHandle,
    /// World-space contact point
    pub point: Vec3,
    /// Unit normal pointing at the focused body
    pub normal: Vec3,
    /// Penetration depth
    pub depth: f32,
    /// New or persistent
    pub phase: ContactPhase,
    /// Seconds since the pair started touching
    pub age: f32,
}

/// One occupied chunk of the broad-phase grid
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSnapshot {
    /// Grid coordinates
    pub key: ChunkKey,
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner (exclusive)
    pub max: Vec3,
    /// Bodies bucketed here, in insertion order
    pub members: Vec<BodyHandle>,
}

impl ChunkSnapshot {
    /// Center of the chunk box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Contacts from the last step, in key order
pub fn contact_snapshots(world: &PhysicsWorld) -> Vec<ContactSnapshot> {
    world
        .contacts()
        .map(|record| ContactSnapshot {
            focused: record.focused,
            other: record.other,
            point: record.contact_point,
            normal: record.normal,
            depth: record.penetration_depth,
            phase: record.phase(),
            age: record.time_since_start,
        })
        .collect()
}

/// Occupied chunks in key order
pub fn chunk_snapshots(world: &PhysicsWorld) -> Vec<ChunkSnapshot> {
    let grid = world.grid();
    grid.iter()
        .map(|(key, members)| {
            let (min, max) = grid.bounds(key);
            ChunkSnapshot {
                key,
                min,
                max,
                members: members.to_vec(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PhysicsConfig;
    use crate::physics::{Collider, Gravity, RigidBody};
    use approx::assert_relative_eq;

    fn scene() -> (PhysicsWorld, BodyHandle, BodyHandle) {
        let config = PhysicsConfig::default().with_chunk_size(Vec3::repeat(4.0));
        let mut world = PhysicsWorld::new(config).unwrap();
        let floor = world
            .register_body(RigidBody::fixed().with_collider(Collider::plane(Vec3::y())))
            .unwrap();
        let ball = world
            .register_body(
                RigidBody::kinematic(1.0)
                    .with_position(Vec3::new(1.0, 0.4, 1.0))
                    .with_collider(Collider::sphere(0.5))
                    .with_force(Gravity::default()),
            )
            .unwrap();
        (world, floor, ball)
    }

    #[test]
    fn test_empty_world_has_no_snapshots() {
        let world = PhysicsWorld::new(PhysicsConfig::default()).unwrap();
        assert!(contact_snapshots(&world).is_empty());
        assert!(chunk_snapshots(&world).is_empty());
    }

    #[test]
    fn test_contact_snapshot_mirrors_record() {
        let (mut world, floor, ball) = scene();
        world.step();

        let contacts = contact_snapshots(&world);
        assert_eq!(contacts.len(), 1);
        let contact = &contacts[0];
        assert_eq!(contact.focused, ball);
        assert_eq!(contact.other, floor);
        assert_eq!(contact.phase, ContactPhase::New);
        assert_relative_eq!(contact.normal, Vec3::y(), epsilon = 1e-6);
        assert!(contact.depth > 0.0);

        world.step();
        let contacts = contact_snapshots(&world);
        assert_eq!(contacts[0].phase, ContactPhase::Persistent);
        assert!(contacts[0].age > 0.0);
    }

    #[test]
    fn test_chunk_snapshot_lists_finite_volumes_only() {
        let (world, _, ball) = scene();
        let chunks = chunk_snapshots(&world);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].key, ChunkKey::new(0, 0, 0));
        assert_eq!(chunks[0].members, vec![ball]);
        assert_relative_eq!(chunks[0].min, Vec3::zeros());
        assert_relative_eq!(chunks[0].max, Vec3::repeat(4.0));
        assert_relative_eq!(chunks[0].center(), Vec3::repeat(2.0));
    }
}
