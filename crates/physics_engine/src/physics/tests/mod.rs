//! Multi-module simulation scenarios
//!
//! Whole-world tests driving `PhysicsWorld::step` through the full pipeline.

mod contact_lifecycle;

use crate::core::config::PhysicsConfig;
use crate::foundation::math::Vec3;
use crate::physics::{BodyHandle, Collider, Gravity, PhysicsMaterial, PhysicsWorld, RigidBody};

/// Default world
fn world() -> PhysicsWorld {
    PhysicsWorld::new(PhysicsConfig::default()).unwrap()
}

/// World without gravity
fn weightless_world() -> PhysicsWorld {
    PhysicsWorld::new(PhysicsConfig::default().with_gravity(Vec3::zeros())).unwrap()
}

/// Static two-sided plane at y = 0
fn add_floor(world: &mut PhysicsWorld, material: PhysicsMaterial) -> BodyHandle {
    world
        .register_body(RigidBody::fixed().with_collider(Collider::plane(Vec3::y()).with_material(material)))
        .unwrap()
}

/// Unit-mass ball of radius 0.5 under gravity
fn add_ball(world: &mut PhysicsWorld, position: Vec3, material: PhysicsMaterial) -> BodyHandle {
    world
        .register_body(
            RigidBody::kinematic(1.0)
                .with_position(position)
                .with_collider(Collider::sphere(0.5).with_material(material))
                .with_force(Gravity::default()),
        )
        .unwrap()
}
