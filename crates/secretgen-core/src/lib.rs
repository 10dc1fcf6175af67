//! # secretgen Core
//!
//! Core utilities, configuration management and logging for secretgen.
//!
//! This crate provides:
//!
//! - **Configuration**: Multi-layer configuration system (defaults, file, programmatic, environment)
//! - **Logging**: Structured logging with selectable output formats
//! - **Data Utilities**: YAML loading, deep merging, dotted-path lookup
//!
//! ## Example
//!
//! ```no_run
//! use secretgen_core::{config::Settings, log};
//!
//! let settings = Settings::load(None)?;
//! log::init(&settings.log)?;
//! # Ok::<(), secretgen_types::SecretGenError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod util;

// Re-export commonly used items
pub use config::{Config, Settings};
pub use secretgen_types::{SecretGenError, Result};

/// secretgen application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// secretgen application name
pub const APP_NAME: &str = "secretgen";
