//! Type-safe identifiers for secrets and secret versions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{SecretGenError, Result};

/// A validated secret container name.
///
/// Secret names are fully qualified resource names of the form
/// `projects/{project}/secrets/{secret}`, where neither segment is empty or
/// contains a slash.
///
/// # Example
///
/// ```
/// use secretgen_types::SecretName;
///
/// let name = SecretName::new("projects/acme/secrets/db").unwrap();
/// assert_eq!(name.project(), "acme");
/// assert_eq!(name.secret_id(), "db");
///
/// // Bare names are qualified with a project
/// let name = SecretName::qualify("db", Some("acme")).unwrap();
/// assert_eq!(name.as_str(), "projects/acme/secrets/db");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretName(String);

impl SecretName {
    /// Create a new validated secret name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not of the form
    /// `projects/{project}/secrets/{secret}`.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        if !Self::is_valid(name) {
            return Err(SecretGenError::Validation(format!(
                "Invalid secret name '{}': expected projects/{{project}}/secrets/{{secret}}",
                name
            )));
        }
        Ok(Self(name.to_string()))
    }

    /// Qualify a possibly bare secret id with a project.
    ///
    /// Names that already contain a slash are validated as-is.
    pub fn qualify(name: &str, project: Option<&str>) -> Result<Self> {
        if name.contains('/') {
            return Self::new(name);
        }

        match project {
            Some(project) if !project.is_empty() => {
                Self::new(format!("projects/{}/secrets/{}", project, name))
            }
            _ => Err(SecretGenError::Validation(format!(
                "Secret '{}' is not fully qualified and no project is configured",
                name
            ))),
        }
    }

    /// Check if a name is valid without allocating.
    pub fn is_valid(name: &str) -> bool {
        let parts: Vec<&str> = name.split('/').collect();
        parts.len() == 4
            && parts[0] == "projects"
            && !parts[1].is_empty()
            && parts[2] == "secrets"
            && !parts[3].is_empty()
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Project segment of the name.
    pub fn project(&self) -> &str {
        self.0.split('/').nth(1).unwrap_or_default()
    }

    /// Secret segment of the name.
    pub fn secret_id(&self) -> &str {
        self.0.split('/').nth(3).unwrap_or_default()
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SecretName {
    type Err = SecretGenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for SecretName {
    type Error = SecretGenError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SecretName> for String {
    fn from(name: SecretName) -> Self {
        name.0
    }
}

/// Server-assigned identifier of a secret version.
///
/// Version ids are opaque: the only requirement is that they are not empty.
/// Ids handed out by Secret Manager look like
/// `projects/{project}/secrets/{secret}/versions/{n}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    /// Create a version id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SecretGenError::Validation(
                "Secret version id cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent secret name, when the id follows the `.../versions/{n}` layout.
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once("/versions/").map(|(parent, _)| parent)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VersionId {
    type Err = SecretGenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_name_validation() {
        assert!(SecretName::new("projects/acme/secrets/db").is_ok());
        assert!(SecretName::new("projects/123/secrets/db-password").is_ok());

        assert!(SecretName::new("db").is_err());
        assert!(SecretName::new("projects//secrets/db").is_err());
        assert!(SecretName::new("projects/acme/secrets/").is_err());
        assert!(SecretName::new("projects/acme/secrets/db/versions/1").is_err());
        assert!(SecretName::new("").is_err());
    }

    #[test]
    fn test_secret_name_segments() {
        let name = SecretName::new("projects/acme/secrets/db").unwrap();
        assert_eq!(name.project(), "acme");
        assert_eq!(name.secret_id(), "db");
    }

    #[test]
    fn test_qualify() {
        let name = SecretName::qualify("db", Some("acme")).unwrap();
        assert_eq!(name.as_str(), "projects/acme/secrets/db");

        let name = SecretName::qualify("projects/other/secrets/db", Some("acme")).unwrap();
        assert_eq!(name.project(), "other");

        assert!(SecretName::qualify("db", None).is_err());
        assert!(SecretName::qualify("db", Some("")).is_err());
    }

    #[test]
    fn test_secret_name_serde() {
        let name: SecretName = serde_json::from_str("\"projects/p/secrets/s\"").unwrap();
        assert_eq!(name.secret_id(), "s");
        assert!(serde_json::from_str::<SecretName>("\"nope\"").is_err());
    }

    #[test]
    fn test_version_id() {
        let id = VersionId::new("projects/p/secrets/s/versions/3").unwrap();
        assert_eq!(id.parent(), Some("projects/p/secrets/s"));

        let opaque = VersionId::new("abc").unwrap();
        assert_eq!(opaque.parent(), None);

        assert!(VersionId::new("").is_err());
        assert!(VersionId::new("   ").is_err());
    }
}
