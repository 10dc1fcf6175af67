//! Core trait definitions for secretgen abstractions.

use async_trait::async_trait;
use crate::errors::Result;
use crate::{SecretName, VersionId};

/// Trait for versioned secret storage backends.
///
/// Implementers expose the four version operations of an append-only secret
/// store. Versions are immutable once added and only ever move from enabled
/// to disabled to destroyed.
///
/// Every call either completes or fails outright with
/// [`SecretGenError::Store`](crate::SecretGenError::Store); implementations
/// never retry internally.
#[async_trait]
pub trait SecretVersionStore: Send + Sync {
    /// Add a new version holding `payload` to the `parent` secret.
    ///
    /// Returns the server-assigned version id.
    async fn add_version(&self, parent: &SecretName, payload: &[u8]) -> Result<VersionId>;

    /// Fetch the payload of a version.
    async fn access_version(&self, version: &VersionId) -> Result<Vec<u8>>;

    /// Disable a version so that it can no longer be accessed.
    async fn disable_version(&self, version: &VersionId) -> Result<()>;

    /// Irreversibly destroy a version's payload.
    async fn destroy_version(&self, version: &VersionId) -> Result<()>;
}
