//! Visible state of a managed resource.

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::identifiers::VersionId;

/// What a resource exposes after create, read or update.
///
/// `value` holds the generated material only when the resource asked for it
/// to be returned; otherwise it is the empty string. Public key fields are
/// set for RSA keys regardless of that setting.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Version id the material was stored under
    pub id: VersionId,
    /// Generated material, or `""` when hidden
    pub value: String,
    /// SubjectPublicKeyInfo PEM (RSA keys only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// OpenSSH `authorized_keys` line (RSA keys only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_ssh: Option<String>,
    /// SHA-256 fingerprint of the SSH public key (RSA keys only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_fingerprint: Option<String>,
}

impl ResourceState {
    /// State for a version whose material may or may not be visible.
    pub fn new(id: VersionId, material: String, return_secret: bool) -> Self {
        Self {
            id,
            value: if return_secret { material } else { String::new() },
            public_key: None,
            public_key_ssh: None,
            public_key_fingerprint: None,
        }
    }

    /// Whether the material is part of this state.
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }
}

impl fmt::Debug for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.value.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("ResourceState")
            .field("id", &self.id)
            .field("value", &value)
            .field("public_key", &self.public_key)
            .field("public_key_ssh", &self.public_key_ssh)
            .field("public_key_fingerprint", &self.public_key_fingerprint)
            .finish()
    }
}

/// Result of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The version was left in the store untouched
    Retained,
    /// The version was disabled and destroyed
    Destroyed,
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::Retained => write!(f, "retained"),
            DeleteOutcome::Destroyed => write!(f, "destroyed"),
        }
    }
}
