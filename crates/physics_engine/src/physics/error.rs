//! Physics error types
//!
//! Only setup-time problems surface as errors. The per-step loop never
//! fails; numerical degeneracies are clamped and counted instead.

use thiserror::Error;

use crate::config::ConfigError;
use crate::foundation::math::Vec3;

/// Physics errors
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Chunk size must be positive and finite on every axis
    #[error("Invalid chunk size {0:?}: every component must be positive")]
    InvalidChunkSize(Vec3),

    /// Timestep must be positive and finite
    #[error("Invalid timestep {0}: must be positive")]
    InvalidTimestep(f32),

    /// Mass must be positive and finite
    #[error("Invalid mass {0}: must be positive")]
    InvalidMass(f32),

    /// Shape parameters are degenerate
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Any other configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Handle does not refer to a registered body
    #[error("Unknown body handle")]
    UnknownBody,

    /// Configuration file could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
