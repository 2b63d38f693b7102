//! # Simulation Configuration
//!
//! Everything the physics world needs at construction: broad-phase chunk
//! size, the fixed timestep, global gravity and air density. Values are
//! validated once when the world is built and are immutable afterwards.
//!
//! ## Example (`physics.toml`)
//!
//! ```toml
//! chunk_size = [16.0, 16.0, 16.0]
//! fixed_timestep = 0.02
//! gravity = [0.0, -9.81, 0.0]
//! air_density = 1.225
//! neighborhood = "Full"
//! ```

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec3;
use crate::physics::PhysicsError;

// Re-export the file-backed config plumbing
pub use crate::config::{Config, ConfigError};

/// Which adjacent chunks take part in broad-phase pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Neighborhood {
    /// The 6 face-adjacent chunks (up to 7 including the centre)
    Faces,
    /// All 26 surrounding chunks (up to 27 including the centre)
    #[default]
    Full,
}

impl Neighborhood {
    /// Cell offsets for this neighbourhood, excluding the centre
    pub fn offsets(self) -> Vec<[i32; 3]> {
        match self {
            Self::Faces => vec![
                [-1, 0, 0],
                [1, 0, 0],
                [0, 1, 0],
                [0, -1, 0],
                [0, 0, 1],
                [0, 0, -1],
            ],
            Self::Full => {
                let mut offsets = Vec::with_capacity(26);
                for x in -1..=1 {
                    for y in -1..=1 {
                        for z in -1..=1 {
                            if (x, y, z) != (0, 0, 0) {
                                offsets.push([x, y, z]);
                            }
                        }
                    }
                }
                offsets
            }
        }
    }
}

/// # Physics Configuration
///
/// Supplied to [`crate::physics::PhysicsWorld::new`]; changing values after
/// construction is not supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Broad-phase chunk dimensions (all components must be positive)
    pub chunk_size: Vec3,
    /// Fixed simulation step in seconds
    pub fixed_timestep: f32,
    /// Global gravity acceleration
    pub gravity: Vec3,
    /// Air density used by quadratic drag (kg/m³)
    pub air_density: f32,
    /// Broad-phase neighbourhood
    pub neighborhood: Neighborhood,
}

impl PhysicsConfig {
    /// Default fixed step (50 Hz)
    pub const DEFAULT_TIMESTEP: f32 = 0.02;

    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            chunk_size: Vec3::new(16.0, 16.0, 16.0),
            fixed_timestep: Self::DEFAULT_TIMESTEP,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            air_density: 1.225,
            neighborhood: Neighborhood::Full,
        }
    }

    /// Set the chunk size
    pub fn with_chunk_size(mut self, chunk_size: Vec3) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the fixed timestep
    pub fn with_fixed_timestep(mut self, dt: f32) -> Self {
        self.fixed_timestep = dt;
        self
    }

    /// Set the gravity vector
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the air density
    pub fn with_air_density(mut self, air_density: f32) -> Self {
        self.air_density = air_density;
        self
    }

    /// Set the broad-phase neighbourhood
    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.chunk_size.iter().all(|c| c.is_finite() && *c > 0.0) {
            return Err(PhysicsError::InvalidChunkSize(self.chunk_size));
        }

        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(PhysicsError::InvalidTimestep(self.fixed_timestep));
        }

        if !self.gravity.iter().all(|c| c.is_finite()) {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }

        if !(self.air_density.is_finite() && self.air_density >= 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "air density must be non-negative, got {}",
                self.air_density
            )));
        }

        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for PhysicsConfig {}
