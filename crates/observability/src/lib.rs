//! `waypoint-observability`: logging setup for the `waypoint` binary and tests.

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use tracing::{ENV_LOG_FORMAT, LogFormat, init_with};

/// Initialize process-wide logging from the environment (see [`tracing::init`]).
///
/// Calling it more than once is harmless.
pub fn init() {
    tracing::init();
}
