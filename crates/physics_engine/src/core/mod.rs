//! # Core Engine Module
//!
//! Shared abstractions the physics subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: Simulation configuration supplied at world construction

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    Neighborhood,
    PhysicsConfig,
    Config,
    ConfigError,
};
