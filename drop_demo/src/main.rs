//! Ball drop demo
//!
//! Drops a ball and a crate onto a floor and lobs a second ball across the
//! scene, logging positions and contacts as the simulation runs headless.
//!
//! ```text
//! RUST_LOG=info cargo run --bin ball_drop [physics.toml|physics.ron]
//! ```

use physics_engine::debug;
use physics_engine::foundation::logging;
use physics_engine::prelude::*;

/// Simulated seconds to run
const DURATION: f32 = 6.0;

/// Host frame times cycle through these to exercise the accumulator
const FRAME_TIMES: [f32; 4] = [1.0 / 60.0, 1.0 / 30.0, 1.0 / 144.0, 0.05];

struct Scene {
    ball: BodyHandle,
    crate_box: BodyHandle,
    projectile: BodyHandle,
}

fn build_scene(world: &mut PhysicsWorld) -> Result<Scene, PhysicsError> {
    world.register_body(
        RigidBody::fixed()
            .with_collider(Collider::plane(Vec3::y()).with_material(PhysicsMaterial::concrete())),
    )?;

    let ball = world.register_body(
        RigidBody::kinematic(1.0)
            .with_position(Vec3::new(0.0, 5.0, 0.0))
            .with_collider(Collider::sphere(0.5).with_material(PhysicsMaterial::rubber()))
            .with_force(Gravity::default())
            .with_force(Drag::new(Drag::SPHERE)),
    )?;

    let crate_box = world.register_body(
        RigidBody::kinematic(1.0)
            .with_position(Vec3::new(3.0, 2.0, 0.0))
            .with_collider(Collider::aabb(Vec3::repeat(0.5)).with_material(PhysicsMaterial::wood()))
            .with_mass_from_density()
            .with_force(Gravity::default()),
    )?;

    let launch = Trajectory::new(45.0, 6.0);
    if let Some(time) = launch.flight_time(world.config().gravity) {
        let landing = launch.position_at(time, world.config().gravity);
        log::info!("Projectile expected to land {:.2}m away after {:.2}s", landing.x, time);
    }
    let projectile = world.register_body(
        RigidBody::kinematic(0.5)
            .with_position(Vec3::new(-4.0, 0.5, 0.0))
            .with_velocity(launch.initial_velocity())
            .with_collider(Collider::sphere(0.25).with_material(PhysicsMaterial::steel()))
            .with_force(Gravity::default()),
    )?;

    Ok(Scene { ball, crate_box, projectile })
}

fn log_body(world: &PhysicsWorld, name: &str, handle: BodyHandle) {
    if let Some(body) = world.body(handle) {
        let p = body.position();
        let v = body.velocity();
        log::info!(
            "  {name:<10} pos ({:6.3}, {:6.3}, {:6.3})  vel ({:6.3}, {:6.3}, {:6.3})",
            p.x, p.y, p.z, v.x, v.y, v.z
        );
    }
}

fn run() -> Result<(), PhysicsError> {
    let mut world = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading physics configuration from {path}");
            PhysicsWorld::from_config_file(path)?
        }
        None => PhysicsWorld::new(PhysicsConfig::default())?,
    };
    let scene = build_scene(&mut world)?;

    let mut clock = FixedTimestep::new(world.config().fixed_timestep)?;
    let mut elapsed = 0.0;
    let mut frame = 0usize;

    while elapsed < DURATION {
        let frame_time = FRAME_TIMES[frame % FRAME_TIMES.len()];
        elapsed += frame_time;
        frame += 1;

        for _ in 0..clock.accumulate(frame_time) {
            let report = world.step();
            if report.contacts_began > 0 {
                log::info!("step {}: {} new contact(s)", report.step, report.contacts_began);
                for contact in debug::contact_snapshots(&world) {
                    log::debug!(
                        "  {:?} <- {:?} depth {:.4} normal {:?}",
                        contact.focused,
                        contact.other,
                        contact.depth,
                        contact.normal
                    );
                }
            }
        }

        if frame % 30 == 0 {
            log::info!("t = {elapsed:.2}s ({} steps)", clock.total_steps());
            log_body(&world, "ball", scene.ball);
            log_body(&world, "crate", scene.crate_box);
            log_body(&world, "projectile", scene.projectile);
        }
    }

    log::info!("Final state after {} steps:", world.step_count());
    log_body(&world, "ball", scene.ball);
    log_body(&world, "crate", scene.crate_box);
    log_body(&world, "projectile", scene.projectile);
    for chunk in debug::chunk_snapshots(&world) {
        log::info!("  chunk {:?}: {} bod(ies)", chunk.key, chunk.members.len());
    }
    Ok(())
}

fn main() {
    logging::init();
    log::info!("Starting ball drop demo...");

    if let Err(e) = run() {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}
