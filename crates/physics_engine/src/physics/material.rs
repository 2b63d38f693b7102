//! Surface materials
//!
//! Coefficients read by the resolver (restitution, friction) and by
//! mass-from-density. Storage and asset loading belong to the host; the
//! presets here only cover common surfaces.

use serde::{Serialize, Deserialize};

/// Physical surface properties of a collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsMaterial {
    /// Fraction of normal velocity kept after impact, in `[0, 1]`
    pub restitution: f32,
    /// Tangential speed below which sliding is cancelled outright
    pub static_friction: f32,
    /// Fraction of tangential speed removed per step while sliding
    pub kinetic_friction: f32,
    /// Mass per unit volume (kg/m³)
    pub density: f32,
}

impl PhysicsMaterial {
    /// Create a material
    pub fn new(restitution: f32, static_friction: f32, kinetic_friction: f32, density: f32) -> Self {
        Self {
            restitution: restitution.clamp(0.0, 1.0),
            static_friction: static_friction.max(0.0),
            kinetic_friction: kinetic_friction.max(0.0),
            density: density.max(0.0),
        }
    }

    /// Bouncy, grippy
    pub fn rubber() -> Self {
        Self::new(0.8, 0.9, 0.6, 1100.0)
    }

    /// Light, moderate friction
    pub fn wood() -> Self {
        Self::new(0.4, 0.5, 0.3, 700.0)
    }

    /// Almost frictionless
    pub fn ice() -> Self {
        Self::new(0.1, 0.05, 0.02, 917.0)
    }

    /// Heavy, hard
    pub fn steel() -> Self {
        Self::new(0.3, 0.6, 0.4, 7850.0)
    }

    /// Dead, rough ground
    pub fn concrete() -> Self {
        Self::new(0.2, 0.8, 0.6, 2400.0)
    }

    /// Look a preset up by name (case-insensitive)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rubber" => Some(Self::rubber()),
            "wood" => Some(Self::wood()),
            "ice" => Some(Self::ice()),
            "steel" => Some(Self::steel()),
            "concrete" => Some(Self::concrete()),
            "default" => Some(Self::default()),
            _ => None,
        }
    }

    /// Set restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set both friction coefficients
    pub fn with_friction(mut self, static_friction: f32, kinetic_friction: f32) -> Self {
        self.static_friction = static_friction.max(0.0);
        self.kinetic_friction = kinetic_friction.max(0.0);
        self
    }

    /// Set density
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density.max(0.0);
        self
    }
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self::new(0.5, 0.4, 0.3, 1000.0)
    }
}
