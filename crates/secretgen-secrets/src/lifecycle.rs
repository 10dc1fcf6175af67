//! Create, read, update and delete for generated resources.
//!
//! The controller runs each operation start to finish against a
//! [`SecretVersionStore`], one store call at a time. Store failures are never
//! retried here; they come back wrapped with the operation and the secret or
//! version involved.

use crate::resource::{ChangeAction, SecretResource};
use secretgen_types::{
    DeleteOutcome, ResourceState, Result, SecretGenError, SecretVersionStore, VersionId,
};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Drives resources through their lifecycle against a version store.
pub struct SecretLifecycle<S: SecretVersionStore + ?Sized> {
    store: Arc<S>,
}

impl<S: SecretVersionStore + ?Sized> Clone for SecretLifecycle<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SecretVersionStore + ?Sized> SecretLifecycle<S> {
    /// Create a controller over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Generate fresh material and add it as a new version.
    ///
    /// # Errors
    ///
    /// [`SecretGenError::InvalidPolicy`] or [`SecretGenError::Generation`]
    /// before anything is written, [`SecretGenError::StoreWrite`] when the
    /// store rejects the version.
    pub async fn create(&self, resource: &SecretResource) -> Result<ResourceState> {
        let settings = resource.settings();
        let span = info_span!(
            "create",
            resource.kind = %resource.kind(),
            secret.parent = %settings.secret,
        );

        async move {
            let generated = resource.generated();
            generated.validate_definition()?;
            let material = generated.generate()?;

            let id = self
                .store
                .add_version(&settings.secret, material.as_bytes())
                .await
                .map_err(|e| SecretGenError::StoreWrite {
                    parent: settings.secret.to_string(),
                    message: e.store_message(),
                })?;

            info!(version.id = %id, "added secret version");
            build_state(resource, id.clone(), material).map_err(|e| {
                warn!(
                    version.id = %id,
                    error = %e,
                    "version was stored but its state could not be built"
                );
                e
            })
        }
        .instrument(span)
        .await
    }

    /// Fetch the stored material and rebuild visible state from it.
    ///
    /// # Errors
    ///
    /// [`SecretGenError::StoreRead`] when the version cannot be accessed,
    /// including when it was disabled or destroyed, and
    /// [`SecretGenError::Decode`] when the payload is not valid material.
    pub async fn read(&self, resource: &SecretResource, id: &VersionId) -> Result<ResourceState> {
        let span = info_span!("read", resource.kind = %resource.kind(), version.id = %id);
        self.fetch(resource, id).instrument(span).await
    }

    /// Re-apply visibility settings to an existing version.
    ///
    /// Never writes a new version: changes to generation parameters need
    /// [`plan`] to report [`ChangeAction::Replace`] and a delete plus create.
    pub async fn update(&self, resource: &SecretResource, id: &VersionId) -> Result<ResourceState> {
        let span = info_span!("update", resource.kind = %resource.kind(), version.id = %id);
        self.fetch(resource, id).instrument(span).await
    }

    /// Disable then destroy the version, unless the resource retains it.
    ///
    /// # Errors
    ///
    /// [`SecretGenError::StoreDelete`] when disabling fails and nothing
    /// changed, [`SecretGenError::PartialDelete`] when the version was
    /// disabled but destroying it failed.
    pub async fn delete(&self, resource: &SecretResource, id: &VersionId) -> Result<DeleteOutcome> {
        let span = info_span!("delete", resource.kind = %resource.kind(), version.id = %id);

        async move {
            if !resource.settings().delete_on_destroy {
                info!("delete_on_destroy is off, leaving version in place");
                return Ok(DeleteOutcome::Retained);
            }

            self.store
                .disable_version(id)
                .await
                .map_err(|e| SecretGenError::StoreDelete {
                    version: id.to_string(),
                    message: e.store_message(),
                })?;
            debug!("disabled secret version");

            self.store
                .destroy_version(id)
                .await
                .map_err(|e| SecretGenError::PartialDelete {
                    version: id.to_string(),
                    message: e.store_message(),
                })?;

            info!("destroyed secret version");
            Ok(DeleteOutcome::Destroyed)
        }
        .instrument(span)
        .await
    }

    async fn fetch(&self, resource: &SecretResource, id: &VersionId) -> Result<ResourceState> {
        let payload = self
            .store
            .access_version(id)
            .await
            .map_err(|e| SecretGenError::StoreRead {
                version: id.to_string(),
                message: e.store_message(),
            })?;
        debug!(bytes = payload.len(), "accessed secret version");

        let material = String::from_utf8(payload).map_err(|_| {
            SecretGenError::Decode(format!("secret version '{}' is not valid UTF-8", id))
        })?;
        build_state(resource, id.clone(), material)
    }
}

/// Decide how to move a resource from `prior` to `desired`.
pub fn plan(prior: &SecretResource, desired: &SecretResource) -> ChangeAction {
    prior.plan_change(desired)
}

fn build_state(resource: &SecretResource, id: VersionId, material: String) -> Result<ResourceState> {
    let settings = resource.settings();
    let mut state = ResourceState::new(id, String::new(), false);
    resource
        .generated()
        .derive(&material, &mut state)
        .map_err(|e| e.for_version(&state.id))?;
    if settings.return_secret {
        state.value = material;
    }
    Ok(state)
}
