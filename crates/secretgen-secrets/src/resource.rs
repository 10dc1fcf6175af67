//! Resource variants and the behaviour they share.

use crate::encoding::{
    decode_private_key, encode_private_key_pem, encode_public_key_pem, encode_public_key_ssh,
    ssh_fingerprint,
};
use crate::generators::password::{generate_password, PasswordPolicy};
use crate::generators::rsa::{generate_private_key, RsaKeyPolicy};
use rand::rngs::OsRng;
use secretgen_types::{ResourceKind, ResourceState, Result, SecretName};
use std::fmt;

/// Default logical version tag.
pub const DEFAULT_LOGICAL_VERSION: &str = "v1";

/// Settings every generated resource carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSettings {
    /// Parent secret the version is added to
    pub secret: SecretName,
    /// Caller-supplied tag; changing it forces a new version
    pub logical_version: String,
    /// Expose the generated material in state
    pub return_secret: bool,
    /// Disable and destroy the version on delete
    pub delete_on_destroy: bool,
}

impl ResourceSettings {
    /// Settings with defaults for everything but the parent secret.
    pub fn new(secret: SecretName) -> Self {
        Self {
            secret,
            logical_version: DEFAULT_LOGICAL_VERSION.to_string(),
            return_secret: false,
            delete_on_destroy: true,
        }
    }

    /// Set whether material is returned.
    pub fn with_return_secret(mut self, return_secret: bool) -> Self {
        self.return_secret = return_secret;
        self
    }

    /// Set whether delete destroys the version.
    pub fn with_delete_on_destroy(mut self, delete_on_destroy: bool) -> Self {
        self.delete_on_destroy = delete_on_destroy;
        self
    }

    /// Set the logical version tag.
    pub fn with_logical_version(mut self, logical_version: impl Into<String>) -> Self {
        self.logical_version = logical_version.into();
        self
    }

    /// Whether a change from `self` to `other` can only be applied by
    /// creating a new version.
    fn forces_replacement(&self, other: &Self) -> bool {
        self.secret != other.secret || self.logical_version != other.logical_version
    }

    fn differs_in_place(&self, other: &Self) -> bool {
        self.return_secret != other.return_secret
            || self.delete_on_destroy != other.delete_on_destroy
    }
}

/// Behaviour a generated resource plugs into the lifecycle.
///
/// Implementations supply the generator and the step that fills in derived
/// state after the material is known.
pub trait GeneratedSecret: Send + Sync {
    /// Kind of resource.
    fn kind(&self) -> ResourceKind;

    /// Common settings.
    fn settings(&self) -> &ResourceSettings;

    /// Check the generation parameters before anything is generated.
    fn validate_definition(&self) -> Result<()>;

    /// Produce fresh material.
    fn generate(&self) -> Result<String>;

    /// Add derived fields to `state` from the stored material.
    fn derive(&self, _material: &str, _state: &mut ResourceState) -> Result<()> {
        Ok(())
    }
}

/// Generated password resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPassword {
    /// Common settings
    pub settings: ResourceSettings,
    /// Password policy
    pub policy: PasswordPolicy,
}

impl GeneratedPassword {
    /// Create a password resource.
    pub fn new(settings: ResourceSettings, policy: PasswordPolicy) -> Self {
        Self { settings, policy }
    }
}

impl GeneratedSecret for GeneratedPassword {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Password
    }

    fn settings(&self) -> &ResourceSettings {
        &self.settings
    }

    fn validate_definition(&self) -> Result<()> {
        self.policy.validate()
    }

    fn generate(&self) -> Result<String> {
        generate_password(&self.policy)
    }
}

/// Generated RSA key resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRsaKey {
    /// Common settings
    pub settings: ResourceSettings,
    /// Key policy
    pub policy: RsaKeyPolicy,
}

impl GeneratedRsaKey {
    /// Create an RSA key resource.
    pub fn new(settings: ResourceSettings, policy: RsaKeyPolicy) -> Self {
        Self { settings, policy }
    }
}

impl GeneratedSecret for GeneratedRsaKey {
    fn kind(&self) -> ResourceKind {
        ResourceKind::RsaKey
    }

    fn settings(&self) -> &ResourceSettings {
        &self.settings
    }

    fn validate_definition(&self) -> Result<()> {
        self.policy.validate()
    }

    fn generate(&self) -> Result<String> {
        let key = generate_private_key(&self.policy, &mut OsRng)?;
        encode_private_key_pem(&key)
    }

    fn derive(&self, material: &str, state: &mut ResourceState) -> Result<()> {
        let public = decode_private_key(material)?.to_public_key();
        state.public_key = Some(encode_public_key_pem(&public)?);
        state.public_key_ssh = Some(encode_public_key_ssh(&public));
        state.public_key_fingerprint = Some(ssh_fingerprint(&public));
        Ok(())
    }
}

/// A generated resource of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretResource {
    /// Password
    Password(GeneratedPassword),
    /// RSA key
    RsaKey(GeneratedRsaKey),
}

impl SecretResource {
    /// The variant as a trait object.
    pub fn generated(&self) -> &dyn GeneratedSecret {
        match self {
            SecretResource::Password(password) => password,
            SecretResource::RsaKey(key) => key,
        }
    }

    /// Kind of resource.
    pub fn kind(&self) -> ResourceKind {
        self.generated().kind()
    }

    /// Common settings.
    pub fn settings(&self) -> &ResourceSettings {
        self.generated().settings()
    }

    /// Decide how to move from this (prior) definition to `desired`.
    pub fn plan_change(&self, desired: &SecretResource) -> ChangeAction {
        let policy_changed = match (self, desired) {
            (SecretResource::Password(prior), SecretResource::Password(next)) => {
                prior.policy != next.policy
            }
            (SecretResource::RsaKey(prior), SecretResource::RsaKey(next)) => {
                prior.policy != next.policy
            }
            _ => return ChangeAction::Replace,
        };

        let prior = self.settings();
        let next = desired.settings();
        if policy_changed || prior.forces_replacement(next) {
            ChangeAction::Replace
        } else if prior.differs_in_place(next) {
            ChangeAction::Update
        } else {
            ChangeAction::None
        }
    }
}

impl From<GeneratedPassword> for SecretResource {
    fn from(password: GeneratedPassword) -> Self {
        SecretResource::Password(password)
    }
}

impl From<GeneratedRsaKey> for SecretResource {
    fn from(key: GeneratedRsaKey) -> Self {
        SecretResource::RsaKey(key)
    }
}

/// What applying a changed definition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    /// Nothing changed
    None,
    /// Only visibility or deletion flags changed; no new material
    Update,
    /// Generation parameters changed; delete and create again
    Replace,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeAction::None => write!(f, "no changes"),
            ChangeAction::Update => write!(f, "update in place"),
            ChangeAction::Replace => write!(f, "replace"),
        }
    }
}
