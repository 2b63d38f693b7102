//! Collision detection: volumes, contacts, dispatch and narrow phase
//!
//! Follows the broad/narrow split of Game Engine Architecture 3rd Edition
//! (GEA 13.3): volumes are stored in body-local terms, placed in the world
//! on demand, and tested pairwise through a dispatch table keyed by shape.
//!
//! # Module Organization
//!
//! - [`shape`] - Collision volumes and their world-space form
//! - [`hull`] - 2D convex hull used for projected cross-sections
//! - [`collider`] - Volume plus material and per-step state
//! - [`contact`] - Contact records and pair keys
//! - [`narrow`] - Per-pair detectors
//! - [`dispatch`] - Triangular shape-pair dispatch table

pub mod shape;
pub mod hull;
pub mod collider;
pub mod contact;
pub mod narrow;
pub mod dispatch;

// Re-export commonly used types
pub use shape::{CollisionVolume, ShapeKind, WorldVolume};
pub use collider::{Collider, VelocityMode, DEFAULT_SKIN_WIDTH};
pub use contact::{ContactKey, ContactPhase, ContactRecord};
pub use narrow::VolumeState;
pub use dispatch::{CollisionTable, DetectFn};
