//! Spatial partitioning data structures
//!
//! Provides the broad-phase index that limits collision tests to nearby
//! volumes.

pub mod partition;

pub use partition::{ChunkGrid, ChunkKey};
