//! Logging system for secretgen.
//!
//! Structured logging through `tracing`, with the output format and default
//! level taken from [`LogConfig`]. `RUST_LOG` still overrides the level.

use secretgen_types::config::{LogConfig, LogFormat};
use secretgen_types::{SecretGenError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events are shown at the configured level.
const LOG_TARGETS: &[&str] = &[
    "secretgen",
    "secretgen_core",
    "secretgen_secrets",
    "secretgen_services",
];

/// Initialize the logging system with default configuration.
pub fn init_default() -> Result<()> {
    init(&LogConfig::default())
}

/// Initialize logging from configuration.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(config)))
        .map_err(|e| SecretGenError::Config(format!("Invalid log filter: {}", e)))?;

    // Logs go to stderr so command output on stdout stays machine readable.
    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| SecretGenError::Config(format!("Failed to initialize logging: {}", e)))
}

fn default_directives(config: &LogConfig) -> String {
    let level = config.level.as_filter();
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}
