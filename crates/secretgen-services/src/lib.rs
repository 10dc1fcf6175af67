//! # secretgen Services
//!
//! Secret version store implementations for secretgen.
//!
//! This crate provides:
//! - **Secret Manager**: async REST client for the Secret Manager v1 API
//! - **Memory**: in-process store for dry runs and tests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
pub mod secret_manager;

pub use memory::{MemoryStore, VersionState};
pub use secret_manager::SecretManagerClient;

use secretgen_types::config::ProviderConfig;
use secretgen_types::{Result, SecretVersionStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Which store a command talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Backend {
    /// Secret Manager REST API
    #[default]
    SecretManager,
    /// Fresh in-memory store, dropped at exit
    Memory,
    /// In-memory store persisted to a JSON file
    MemoryFile(PathBuf),
}

/// Build the store for `backend`.
pub fn connect(config: &ProviderConfig, backend: &Backend) -> Result<Arc<dyn SecretVersionStore>> {
    match backend {
        Backend::SecretManager => {
            tracing::debug!(endpoint = %config.endpoint, "using secret manager REST API");
            Ok(Arc::new(SecretManagerClient::new(config)?))
        }
        Backend::Memory => {
            tracing::debug!("using in-memory secret store");
            Ok(Arc::new(MemoryStore::new()))
        }
        Backend::MemoryFile(path) => Ok(Arc::new(MemoryStore::open(path)?)),
    }
}
