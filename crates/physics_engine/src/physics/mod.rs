//! Rigid-body simulation and collision response
//!
//! The world owns every body and runs the fixed-step pipeline: integrate,
//! broad phase, narrow phase, resolve, commit. Bodies carry force sources
//! and an optional collider.

pub mod error;
pub mod material;
pub mod collision;
pub mod forces;
pub mod body;
pub mod resolver;
pub mod world;
pub mod trajectory;

#[cfg(test)]
mod tests;

pub use error::PhysicsError;
pub use material::PhysicsMaterial;
pub use collision::{
    Collider,
    CollisionTable,
    CollisionVolume,
    ContactKey,
    ContactPhase,
    ContactRecord,
    ShapeKind,
    VelocityMode,
};
pub use forces::{ConstantForce, Drag, ForceContext, ForceSource, Gravity};
pub use body::{BodyHandle, RigidBody, SimulationMode};
pub use world::{PhysicsWorld, StepReport};
pub use trajectory::Trajectory;
