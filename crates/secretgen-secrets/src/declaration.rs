//! Declared resources, as read from a declarations file.
//!
//! Declarations are plain data. [`ResourceDeclaration::to_resource`]
//! validates one and turns it into a [`SecretResource`] the lifecycle can run.

use crate::generators::password::{
    PasswordPolicy, RequiredGroup, DEFAULT_ALPHABET, DEFAULT_LENGTH,
};
use crate::generators::rsa::{RsaKeyPolicy, DEFAULT_KEY_SIZE};
use crate::resource::{
    GeneratedPassword, GeneratedRsaKey, ResourceSettings, SecretResource, DEFAULT_LOGICAL_VERSION,
};
use secretgen_core::util::{load_yaml, load_yaml_file};
use secretgen_types::{ResourceKind, Result, SecretGenError, SecretName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default declarations file name.
pub const DEFAULT_DECLARATIONS_FILE: &str = "secretgen.yml";

/// A declared resource, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceDeclaration {
    /// `type: password`
    Password(PasswordDeclaration),
    /// `type: rsa_key`
    RsaKey(RsaKeyDeclaration),
}

/// Fields of a password declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PasswordDeclaration {
    /// Parent secret, fully qualified or bare
    pub secret: String,
    /// Password length
    #[serde(default = "default_length")]
    pub length: usize,
    /// Characters for the unconstrained part
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    /// Required character groups
    #[serde(default)]
    pub required: Vec<RequiredGroup>,
    /// Logical version tag
    #[serde(default = "default_logical_version")]
    pub logical_version: String,
    /// Expose the password in state
    #[serde(default)]
    pub return_secret: bool,
    /// Destroy the version on delete
    #[serde(default = "default_true")]
    pub delete_on_destroy: bool,
}

/// Fields of an RSA key declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RsaKeyDeclaration {
    /// Parent secret, fully qualified or bare
    pub secret: String,
    /// Modulus size in bits
    #[serde(default = "default_size")]
    pub size: usize,
    /// Logical version tag
    #[serde(default = "default_logical_version")]
    pub logical_version: String,
    /// Expose the private key in state
    #[serde(default)]
    pub return_secret: bool,
    /// Destroy the version on delete
    #[serde(default = "default_true")]
    pub delete_on_destroy: bool,
}

fn default_length() -> usize {
    DEFAULT_LENGTH
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

fn default_size() -> usize {
    DEFAULT_KEY_SIZE
}

fn default_logical_version() -> String {
    DEFAULT_LOGICAL_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

fn settings(
    secret: &str,
    logical_version: &str,
    return_secret: bool,
    delete_on_destroy: bool,
    project: Option<&str>,
) -> Result<ResourceSettings> {
    Ok(ResourceSettings::new(SecretName::qualify(secret, project)?)
        .with_logical_version(logical_version)
        .with_return_secret(return_secret)
        .with_delete_on_destroy(delete_on_destroy))
}

impl ResourceDeclaration {
    /// Kind of resource declared.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceDeclaration::Password(_) => ResourceKind::Password,
            ResourceDeclaration::RsaKey(_) => ResourceKind::RsaKey,
        }
    }

    /// Validate and convert into a runnable resource.
    ///
    /// Bare secret names are qualified with `project`.
    pub fn to_resource(&self, project: Option<&str>) -> Result<SecretResource> {
        let resource: SecretResource = match self {
            ResourceDeclaration::Password(decl) => {
                let policy = PasswordPolicy {
                    length: decl.length,
                    alphabet: decl.alphabet.clone(),
                    required: decl.required.clone(),
                };
                policy.validate()?;
                GeneratedPassword::new(
                    settings(
                        &decl.secret,
                        &decl.logical_version,
                        decl.return_secret,
                        decl.delete_on_destroy,
                        project,
                    )?,
                    policy,
                )
                .into()
            }
            ResourceDeclaration::RsaKey(decl) => {
                let policy = RsaKeyPolicy::new(decl.size);
                policy.validate()?;
                GeneratedRsaKey::new(
                    settings(
                        &decl.secret,
                        &decl.logical_version,
                        decl.return_secret,
                        decl.delete_on_destroy,
                        project,
                    )?,
                    policy,
                )
                .into()
            }
        };
        Ok(resource)
    }
}

/// All resources in a declarations file, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declarations {
    /// Declared resources
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceDeclaration>,
}

impl Declarations {
    /// Load declarations from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let value = load_yaml_file(path).map_err(|e| {
            SecretGenError::Config(format!(
                "Failed to load declarations from {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_value(value)
    }

    /// Parse declarations from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_value(load_yaml(content)?)
    }

    fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .map_err(|e| SecretGenError::Validation(format!("Invalid declarations: {}", e)))
    }

    /// Look up a declaration by name.
    pub fn get(&self, name: &str) -> Result<&ResourceDeclaration> {
        self.resources.get(name).ok_or_else(|| {
            SecretGenError::Validation(format!("No resource named '{}' is declared", name))
        })
    }

    /// Validated resource for `name`.
    pub fn resource(&self, name: &str, project: Option<&str>) -> Result<SecretResource> {
        self.get(name)?.to_resource(project)
    }

    /// Validate every declaration, collecting one error per invalid resource.
    pub fn validate(&self, project: Option<&str>) -> Vec<(String, SecretGenError)> {
        self.resources
            .iter()
            .filter_map(|(name, decl)| {
                decl.to_resource(project)
                    .err()
                    .map(|e| (name.clone(), e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ChangeAction;

    const EXAMPLE: &str = r#"
resources:
  db-password:
    type: password
    secret: projects/acme/secrets/db
    length: 24
    required:
      - { count: 2, alphabet: "0123456789" }
  deploy-key:
    type: rsa_key
    secret: deploy-key
    size: 2048
    return_secret: true
"#;

    #[test]
    fn test_parse_example() {
        let decls = Declarations::from_yaml(EXAMPLE).unwrap();
        assert_eq!(decls.resources.len(), 2);

        match decls.get("db-password").unwrap() {
            ResourceDeclaration::Password(p) => {
                assert_eq!(p.length, 24);
                assert_eq!(p.alphabet, DEFAULT_ALPHABET);
                assert_eq!(p.required, vec![RequiredGroup::new(2, "0123456789")]);
                assert_eq!(p.logical_version, "v1");
                assert!(!p.return_secret);
                assert!(p.delete_on_destroy);
            }
            other => panic!("unexpected declaration {:?}", other),
        }

        assert_eq!(decls.get("deploy-key").unwrap().kind(), ResourceKind::RsaKey);
    }

    #[test]
    fn test_to_resource_qualifies_bare_names() {
        let decls = Declarations::from_yaml(EXAMPLE).unwrap();
        let key = decls.resource("deploy-key", Some("acme")).unwrap();
        assert_eq!(key.settings().secret.as_str(), "projects/acme/secrets/deploy-key");
        assert!(key.settings().return_secret);

        assert!(decls.resource("deploy-key", None).is_err());
    }

    #[test]
    fn test_unknown_resource() {
        let decls = Declarations::from_yaml(EXAMPLE).unwrap();
        assert!(matches!(
            decls.get("nope"),
            Err(SecretGenError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_policies_rejected_at_boundary() {
        let decls = Declarations::from_yaml(
            r#"
resources:
  short:
    type: password
    secret: projects/p/secrets/s
    length: 2
    required:
      - { count: 3, alphabet: "x" }
  tiny:
    type: rsa_key
    secret: projects/p/secrets/k
    size: 256
  fine:
    type: password
    secret: projects/p/secrets/f
"#,
        )
        .unwrap();

        let errors = decls.validate(None);
        let names: Vec<&str> = errors.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["short", "tiny"]);
        assert!(errors
            .iter()
            .all(|(_, e)| matches!(e, SecretGenError::InvalidPolicy(_))));
    }

    #[test]
    fn test_unknown_fields_and_types_rejected() {
        let bad_field = "resources:\n  a:\n    type: password\n    secret: projects/p/secrets/s\n    lenght: 3\n";
        assert!(Declarations::from_yaml(bad_field).is_err());

        let bad_type = "resources:\n  a:\n    type: certificate\n    secret: projects/p/secrets/s\n";
        assert!(Declarations::from_yaml(bad_type).is_err());
    }

    #[test]
    fn test_empty_file() {
        assert!(Declarations::from_yaml("").unwrap().resources.is_empty());
    }

    #[test]
    fn test_plan_between_declaration_files() {
        let prior = Declarations::from_yaml(EXAMPLE).unwrap();
        let desired = Declarations::from_yaml(&EXAMPLE.replace("length: 24", "length: 25")).unwrap();

        let before = prior.resource("db-password", None).unwrap();
        let after = desired.resource("db-password", None).unwrap();
        assert_eq!(before.plan_change(&after), ChangeAction::Replace);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_DECLARATIONS_FILE);
        std::fs::write(&path, EXAMPLE).unwrap();

        let decls = Declarations::load(&path).unwrap();
        assert!(decls.resources.contains_key("db-password"));

        assert!(matches!(
            Declarations::load(dir.path().join("missing.yml")),
            Err(SecretGenError::Config(_))
        ));
    }
}
