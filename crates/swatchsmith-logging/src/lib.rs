// ABOUTME: Logging setup shared by the swatch binary and the engine crates
// ABOUTME: Re-exports the tracing macros so engine crates log without a direct tracing dependency

pub mod config;
pub mod layers;
pub mod performance;
pub mod subscriber;

pub use tracing::{debug, error, info, trace, warn};

pub use config::{LogLevel, LoggingConfig};
pub use performance::PassTimer;
pub use subscriber::{LoggingGuard, init_subscriber};

use anyhow::Result;

/// Apply `SWATCHSMITH_LOG*` overrides to `config` and install the subscriber.
pub fn init_logging_with_config(mut config: LoggingConfig) -> Result<LoggingGuard> {
    config.apply_env_overrides()?;
    init_subscriber(config)
}
