//! Debug module for inspection and visualization tools
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 10.2:
//! "Debug Drawing Facilities"
//!
//! The engine draws nothing itself. These snapshots copy out what a host
//! needs to render contacts and grid occupancy.

pub mod snapshot;

pub use snapshot::{chunk_snapshots, contact_snapshots, ChunkSnapshot, ContactSnapshot};
