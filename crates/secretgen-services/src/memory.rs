//! In-process secret version store.
//!
//! Behaves like Secret Manager for the four version operations, which makes
//! it useful for dry runs and tests. A store opened with
//! [`MemoryStore::open`] is backed by a JSON file and written back after
//! every change, so versions survive between CLI runs.

use async_trait::async_trait;
use secretgen_types::{Result, SecretGenError, SecretName, SecretVersionStore, VersionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// State of a stored version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionState {
    /// Accessible
    Enabled,
    /// Kept but not accessible
    Disabled,
    /// Payload erased
    Destroyed,
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionState::Enabled => write!(f, "ENABLED"),
            VersionState::Disabled => write!(f, "DISABLED"),
            VersionState::Destroyed => write!(f, "DESTROYED"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StoredVersion {
    state: VersionState,
    #[serde(with = "payload")]
    payload: Vec<u8>,
}

mod payload {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

// Versions per parent in insertion order; version `n` is at index `n - 1`.
type Secrets = HashMap<String, Vec<StoredVersion>>;

/// In-memory [`SecretVersionStore`] guarded by an async lock.
#[derive(Default)]
pub struct MemoryStore {
    secrets: RwLock<Secrets>,
    path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by `path`.
    ///
    /// A missing file starts an empty store; the file is created on the
    /// first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let secrets = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                SecretGenError::Config(format!(
                    "Invalid memory store file {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            Secrets::new()
        };

        tracing::debug!(path = %path.display(), "opened file-backed memory store");
        Ok(Self {
            secrets: RwLock::new(secrets),
            path: Some(path),
        })
    }

    /// File backing the store, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self, secrets: &Secrets) -> Result<()> {
        if let Some(path) = &self.path {
            fs::write(path, serde_json::to_string_pretty(secrets)?)?;
        }
        Ok(())
    }

    /// Current state of a version, if it exists.
    pub async fn state(&self, version: &VersionId) -> Option<VersionState> {
        let (parent, index) = locate(version).ok()?;
        let secrets = self.secrets.read().await;
        secrets.get(parent)?.get(index).map(|v| v.state)
    }

    /// Number of versions ever added to `parent`.
    pub async fn version_count(&self, parent: &SecretName) -> usize {
        self.secrets
            .read()
            .await
            .get(parent.as_str())
            .map_or(0, Vec::len)
    }

    async fn transition(
        &self,
        version: &VersionId,
        apply: impl FnOnce(&mut StoredVersion) -> Result<()>,
    ) -> Result<()> {
        let (parent, index) = locate(version)?;
        let mut secrets = self.secrets.write().await;
        let stored = secrets
            .get_mut(parent)
            .and_then(|versions| versions.get_mut(index))
            .ok_or_else(|| not_found(version))?;
        apply(stored)?;
        self.persist(&secrets)
    }
}

fn not_found(version: &VersionId) -> SecretGenError {
    SecretGenError::Store(format!("NOT_FOUND: secret version {} does not exist", version))
}

fn failed_precondition(version: &VersionId, state: VersionState) -> SecretGenError {
    SecretGenError::Store(format!(
        "FAILED_PRECONDITION: secret version {} is in {} state",
        version, state
    ))
}

/// Split a version id into its parent and the index of the version.
fn locate(version: &VersionId) -> Result<(&str, usize)> {
    let (parent, number) = version
        .as_str()
        .rsplit_once("/versions/")
        .ok_or_else(|| not_found(version))?;
    let number: usize = number.parse().map_err(|_| not_found(version))?;
    if number == 0 {
        return Err(not_found(version));
    }
    Ok((parent, number - 1))
}

#[async_trait]
impl SecretVersionStore for MemoryStore {
    async fn add_version(&self, parent: &SecretName, payload: &[u8]) -> Result<VersionId> {
        let mut secrets = self.secrets.write().await;
        let versions = secrets.entry(parent.to_string()).or_default();
        versions.push(StoredVersion {
            state: VersionState::Enabled,
            payload: payload.to_vec(),
        });
        let id = VersionId::new(format!("{}/versions/{}", parent, versions.len()))?;
        self.persist(&secrets)?;
        Ok(id)
    }

    async fn access_version(&self, version: &VersionId) -> Result<Vec<u8>> {
        let (parent, index) = locate(version)?;
        let secrets = self.secrets.read().await;
        let stored = secrets
            .get(parent)
            .and_then(|versions| versions.get(index))
            .ok_or_else(|| not_found(version))?;

        match stored.state {
            VersionState::Enabled => Ok(stored.payload.clone()),
            state => Err(failed_precondition(version, state)),
        }
    }

    async fn disable_version(&self, version: &VersionId) -> Result<()> {
        self.transition(version, |stored| match stored.state {
            VersionState::Destroyed => Err(failed_precondition(version, stored.state)),
            _ => {
                stored.state = VersionState::Disabled;
                Ok(())
            }
        })
        .await
    }

    async fn destroy_version(&self, version: &VersionId) -> Result<()> {
        self.transition(version, |stored| match stored.state {
            VersionState::Disabled => {
                stored.state = VersionState::Destroyed;
                stored.payload.clear();
                Ok(())
            }
            state => Err(failed_precondition(version, state)),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent() -> SecretName {
        SecretName::new("projects/p/secrets/s").unwrap()
    }

    #[tokio::test]
    async fn test_versions_are_numbered_per_parent() {
        let store = MemoryStore::new();
        let first = store.add_version(&parent(), b"one").await.unwrap();
        let second = store.add_version(&parent(), b"two").await.unwrap();
        let other = store
            .add_version(&SecretName::new("projects/p/secrets/t").unwrap(), b"x")
            .await
            .unwrap();

        assert_eq!(first.as_str(), "projects/p/secrets/s/versions/1");
        assert_eq!(second.as_str(), "projects/p/secrets/s/versions/2");
        assert_eq!(other.as_str(), "projects/p/secrets/t/versions/1");
        assert_eq!(store.version_count(&parent()).await, 2);

        assert_eq!(store.access_version(&first).await.unwrap(), b"one");
        assert_eq!(store.access_version(&second).await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_disable_then_destroy() {
        let store = MemoryStore::new();
        let id = store.add_version(&parent(), b"secret").await.unwrap();

        store.disable_version(&id).await.unwrap();
        assert_eq!(store.state(&id).await, Some(VersionState::Disabled));
        assert!(store.access_version(&id).await.is_err());

        store.destroy_version(&id).await.unwrap();
        assert_eq!(store.state(&id).await, Some(VersionState::Destroyed));

        match store.access_version(&id).await {
            Err(SecretGenError::Store(msg)) => assert!(msg.contains("DESTROYED")),
            other => panic!("expected store error, got {:?}", other),
        }
        assert!(store.disable_version(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_destroy_requires_disabled() {
        let store = MemoryStore::new();
        let id = store.add_version(&parent(), b"secret").await.unwrap();

        assert!(store.destroy_version(&id).await.is_err());
        assert_eq!(store.state(&id).await, Some(VersionState::Enabled));
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = MemoryStore::open(&path).unwrap();
        let kept = store.add_version(&parent(), b"kept").await.unwrap();
        let gone = store.add_version(&parent(), b"gone").await.unwrap();
        store.disable_version(&gone).await.unwrap();
        store.destroy_version(&gone).await.unwrap();
        drop(store);

        let reopened = MemoryStore::open(&path).unwrap();
        assert_eq!(reopened.path(), Some(path.as_path()));
        assert_eq!(reopened.access_version(&kept).await.unwrap(), b"kept");
        assert_eq!(reopened.state(&gone).await, Some(VersionState::Destroyed));

        let next = reopened.add_version(&parent(), b"next").await.unwrap();
        assert_eq!(next.as_str(), "projects/p/secrets/s/versions/3");
    }

    #[test]
    fn test_open_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        match MemoryStore::open(&path) {
            Err(SecretGenError::Config(msg)) => assert!(msg.contains("store.json")),
            Err(other) => panic!("expected config error, got {:?}", other),
            Ok(_) => panic!("expected config error"),
        }
    }

    #[tokio::test]
    async fn test_unknown_versions() {
        let store = MemoryStore::new();
        for id in ["projects/p/secrets/s/versions/1", "projects/p/secrets/s/versions/0", "opaque"] {
            let id = VersionId::new(id).unwrap();
            assert!(store.access_version(&id).await.is_err());
            assert!(store.disable_version(&id).await.is_err());
            assert_eq!(store.state(&id).await, None);
        }
    }
}
