//! # Physics Engine
//!
//! A fixed-timestep 3D rigid-body physics and collision engine for games.
//!
//! ## Features
//!
//! - **Broad Phase**: Uniform chunk grid limiting collision checks to nearby objects
//! - **Dispatch Table**: Triangular per-shape-pair lookup, each interaction implemented once
//! - **Narrow Phase**: Sphere, plane, halfspace and axis-aligned box contact generation
//! - **Resolution**: Un-intersection, restitution impulses and static/kinetic friction
//! - **Deterministic Stepping**: Ordered phases, ordered containers, no hidden global state
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use physics_engine::prelude::*;
//!
//! fn main() -> Result<(), PhysicsError> {
//!     let mut world = PhysicsWorld::new(PhysicsConfig::default())?;
//!
//!     world.register_body(
//!         RigidBody::fixed().with_collider(Collider::plane(Vec3::y())),
//!     )?;
//!     let ball = world.register_body(
//!         RigidBody::kinematic(1.0)
//!             .with_position(Vec3::new(0.0, 5.0, 0.0))
//!             .with_collider(Collider::sphere(0.5))
//!             .with_force(Gravity::default()),
//!     )?;
//!
//!     let mut clock = FixedTimestep::new(world.config().fixed_timestep)?;
//!     for _ in 0..clock.accumulate(1.0 / 60.0) {
//!         world.step();
//!     }
//!
//!     if let Some(body) = world.body(ball) {
//!         log::info!("ball at {:?}", body.position());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod physics;
pub mod spatial;
pub mod debug;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{Neighborhood, PhysicsConfig},
        foundation::{
            math::{PlaneAxis, Quat, Vec3},
            time::FixedTimestep,
        },
        physics::{
            BodyHandle, Collider, CollisionVolume, ConstantForce, ContactRecord, Drag,
            ForceSource, Gravity, PhysicsError, PhysicsMaterial, PhysicsWorld, RigidBody,
            ShapeKind, SimulationMode, StepReport, Trajectory, VelocityMode,
        },
        spatial::{ChunkGrid, ChunkKey},
    };
}
