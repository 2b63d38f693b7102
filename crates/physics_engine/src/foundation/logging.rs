//! Logging utilities and structured logging support
//!
//! The engine only talks to the `log` facade. Hosts decide whether and how
//! records are emitted; [`init`] is the default env_logger setup.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Honours `RUST_LOG`, e.g. `RUST_LOG=physics_engine=debug`.
pub fn init() {
    env_logger::init();
}
