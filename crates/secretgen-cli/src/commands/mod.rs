//! CLI command implementations.

pub mod plan;
pub mod resource;
pub mod validate;

use anyhow::{Context as _, Result};
use secretgen_core::Settings;
use secretgen_secrets::{Declarations, SecretLifecycle};
use secretgen_services::Backend;
use secretgen_types::SecretVersionStore;
use std::path::Path;

/// Settings shared by every command.
pub struct Context {
    pub settings: Settings,
}

impl Context {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Project used to qualify bare secret names.
    pub fn project(&self) -> Option<&str> {
        self.settings.provider.project.as_deref()
    }

    pub fn declarations(&self, path: &Path) -> Result<Declarations> {
        Declarations::load(path)
            .with_context(|| format!("Failed to read declarations from {}", path.display()))
    }

    pub fn lifecycle(&self, backend: &Backend) -> Result<SecretLifecycle<dyn SecretVersionStore>> {
        let store = secretgen_services::connect(&self.settings.provider, backend)
            .context("Failed to set up secret store")?;
        Ok(SecretLifecycle::new(store))
    }
}
