//! Log subscriber for the CLI binary

use crate::cli::error::CliError;
use tracing_subscriber::{EnvFilter, fmt};

/// Default level when neither `RUST_LOG` nor `--log-level` is given
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_tracing(log_level: &str) -> Result<(), CliError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level).map_err(|e| {
            CliError::InvalidArgument(format!("Invalid log level '{}': {}", log_level, e))
        })?,
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::InvalidArgument(format!("Failed to install logger: {}", e)))
}
