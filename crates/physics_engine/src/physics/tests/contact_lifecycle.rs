//! Contact begin/persist/end transitions across steps

use approx::assert_relative_eq;

use super::{add_ball, add_floor, weightless_world, world};
use crate::foundation::math::Vec3;
use crate::physics::{
    Collider, ContactKey, ContactPhase, PhysicsMaterial, PhysicsWorld, RigidBody, VelocityMode,
};

fn add_mover(world: &mut PhysicsWorld, x: f32, vx: f32, mode: VelocityMode) -> crate::physics::BodyHandle {
    world
        .register_body(
            RigidBody::kinematic(1.0)
                .with_position(Vec3::new(x, 0.0, 0.0))
                .with_velocity(Vec3::new(vx, 0.0, 0.0))
                .with_collider(Collider::sphere(0.5).with_velocity_mode(mode)),
        )
        .unwrap()
}

#[test]
fn test_elastic_head_on_exchanges_velocities() {
    let mut world = weightless_world();
    let left = add_mover(&mut world, -1.0, 1.0, VelocityMode::Reflect);
    let right = add_mover(&mut world, 1.0, -1.0, VelocityMode::Reflect);
    let key = ContactKey::new(left, right);

    let mut began_at = None;
    let mut ended_at = None;
    for step in 0..100 {
        world.step();
        if world.contacts_began().contains(&key) {
            began_at.get_or_insert(step);
        }
        if world.contacts_ended().contains(&key) {
            ended_at.get_or_insert(step);
        }
    }

    let (began_at, ended_at) = (began_at.unwrap(), ended_at.unwrap());
    assert!(began_at < ended_at);
    assert_relative_eq!(world.body(left).unwrap().velocity().x, -1.0, epsilon = 1e-4);
    assert_relative_eq!(world.body(right).unwrap().velocity().x, 1.0, epsilon = 1e-4);
    assert_eq!(world.contacts().count(), 0);
}

#[test]
fn test_momentum_is_conserved_between_unequal_masses() {
    let mut world = weightless_world();
    let light = add_mover(&mut world, -1.0, 2.0, VelocityMode::ZeroOnImpact);
    let heavy = world
        .register_body(
            RigidBody::kinematic(3.0)
                .with_position(Vec3::new(1.0, 0.0, 0.0))
                .with_collider(Collider::sphere(0.5)),
        )
        .unwrap();

    for _ in 0..100 {
        world.step();
    }

    let p_light = world.body(light).unwrap().velocity().x * 1.0;
    let p_heavy = world.body(heavy).unwrap().velocity().x * 3.0;
    assert_relative_eq!(p_light + p_heavy, 2.0, epsilon = 1e-4);
    // Perfectly inelastic: common velocity
    assert_relative_eq!(world.body(light).unwrap().velocity().x, 0.5, epsilon = 1e-4);
    assert_relative_eq!(world.body(heavy).unwrap().velocity().x, 0.5, epsilon = 1e-4);
}

#[test]
fn test_resting_contact_ages_each_step() {
    let mut world = world();
    let material = PhysicsMaterial::default().with_restitution(0.0);
    let floor = add_floor(&mut world, material);
    let ball = add_ball(&mut world, Vec3::new(0.0, 0.47, 0.0), material);
    let dt = world.config().fixed_timestep;

    world.step();
    let first = *world.contact(floor, ball).unwrap();
    assert_eq!(first.phase(), ContactPhase::New);
    assert_eq!(first.time_since_start, 0.0);
    assert!(first.resolved);
    assert_eq!(world.contacts_began().len(), 1);

    for n in 1..=5 {
        world.step();
        let record = world.contact(ball, floor).unwrap();
        assert_eq!(record.phase(), ContactPhase::Persistent);
        assert_relative_eq!(record.time_since_start, dt * n as f32, epsilon = 1e-5);
        assert!(world.contacts_began().is_empty());
    }
}

#[test]
fn test_contact_normal_points_at_focused_body() {
    let mut world = world();
    let floor = add_floor(&mut world, PhysicsMaterial::default());
    let ball = add_ball(&mut world, Vec3::new(0.0, 0.45, 0.0), PhysicsMaterial::default());

    world.step();
    let record = world.contact(floor, ball).unwrap();
    // Sphere ranks below plane, so the ball is focused
    assert_eq!(record.focused, ball);
    assert_eq!(record.other, floor);
    assert_relative_eq!(record.normal, Vec3::y(), epsilon = 1e-6);
    assert!(record.penetration_depth > 0.0);
}

#[test]
fn test_lifted_ball_ends_contact() {
    let mut world = world();
    let floor = add_floor(&mut world, PhysicsMaterial::default());
    let ball = add_ball(&mut world, Vec3::new(0.0, 0.47, 0.0), PhysicsMaterial::default());

    world.step();
    assert!(world.contact(floor, ball).is_some());

    let rotation = *world.body(ball).unwrap().rotation();
    world.body_mut(ball).unwrap().set_transform(Vec3::new(0.0, 3.0, 0.0), rotation);
    let report = world.step();
    assert_eq!(report.contacts_ended, 1);
    assert!(world.contacts_ended().contains(&ContactKey::new(floor, ball)));
    assert!(world.contact(floor, ball).is_none());
}
