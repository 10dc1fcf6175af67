//! Configuration management for secretgen.
//!
//! This module provides multi-layer configuration support with:
//! - File-based configuration
//! - Environment variable overrides
//! - Programmatic updates
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this priority order:
//! 1. Environment variables
//! 2. Programmatically set values
//! 3. Values loaded from file
//! 4. Default values
//!
//! ## Example
//!
//! ```no_run
//! use secretgen_core::config::Settings;
//!
//! let settings = Settings::load(Some("secretgen-config.yml".as_ref()))?;
//! println!("using endpoint {}", settings.provider.endpoint);
//! # Ok::<(), secretgen_types::SecretGenError>(())
//! ```

use secretgen_types::{SecretGenError, Result};
use secretgen_types::config::{LogConfig, ProviderConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::util::data::{deep_merge, get_path, load_yaml_file};

/// Environment variables consulted for each configuration key, first set wins.
pub const ENV_OVERRIDES: &[(&str, &[&str])] = &[
    ("provider.access_token", &["GOOGLE_OAUTH_ACCESS_TOKEN"]),
    (
        "provider.project",
        &["GOOGLE_PROJECT", "GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT", "CLOUDSDK_CORE_PROJECT"],
    ),
    ("provider.endpoint", &["GOOGLE_SECRETMANAGER_CUSTOM_ENDPOINT"]),
    ("log.level", &["SECRETGEN_LOG_LEVEL"]),
];

static ENDPOINT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r".*/[^/]+/$").unwrap_or_else(|e| panic!("invalid endpoint pattern: {}", e))
});

/// Configuration layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Default values
    Default = 0,
    /// Values loaded from file
    Loaded = 1,
    /// Values set programmatically
    Set = 2,
    /// Values from environment variables
    Environment = 3,
}

impl ConfigLayer {
    const LOWEST_FIRST: [ConfigLayer; 4] = [
        ConfigLayer::Default,
        ConfigLayer::Loaded,
        ConfigLayer::Set,
        ConfigLayer::Environment,
    ];
}

/// Layered configuration document.
///
/// This is the low-level configuration type. For the typed view, see
/// [`Settings`].
#[derive(Clone, Debug, Default)]
pub struct Config {
    layers: HashMap<ConfigLayer, Value>,
}

impl Config {
    /// Create a new configuration from a file path.
    ///
    /// If the file doesn't exist, an empty configuration is created.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();

        if path.exists() {
            let value = load_yaml_file(path).map_err(|e| {
                SecretGenError::Config(format!("Failed to load {}: {}", path.display(), e))
            })?;
            // An empty file parses as null
            if !value.is_null() {
                config.layers.insert(ConfigLayer::Loaded, value);
            }
        }

        Ok(config)
    }

    /// Replace the default layer.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.layers.insert(ConfigLayer::Default, defaults);
        self
    }

    /// Populate the environment layer using `lookup` for each variable in
    /// [`ENV_OVERRIDES`].
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_layer = Value::Object(Default::default());

        for (key, vars) in ENV_OVERRIDES {
            let found = vars
                .iter()
                .filter_map(|var| lookup(var))
                .find(|value| !value.is_empty());

            if let Some(value) = found {
                tracing::debug!(key, "configuration value taken from environment");
                Self::set_value_at_path(&mut env_layer, key, Value::String(value))?;
            }
        }

        self.layers.insert(ConfigLayer::Environment, env_layer);
        Ok(())
    }

    /// Get a configuration value by key, respecting layer priority.
    ///
    /// Returns None if the key doesn't exist in any layer.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        ConfigLayer::LOWEST_FIRST
            .iter()
            .rev()
            .filter_map(|layer| self.layers.get(layer))
            .filter_map(|data| get_path(data, key))
            .find_map(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Set a configuration value programmatically.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| SecretGenError::Config(format!("Failed to serialize value: {}", e)))?;

        let set_layer = self
            .layers
            .entry(ConfigLayer::Set)
            .or_insert_with(|| Value::Object(Default::default()));

        Self::set_value_at_path(set_layer, key, value)
    }

    /// Get merged data from all layers.
    pub fn merged(&self) -> Value {
        ConfigLayer::LOWEST_FIRST
            .iter()
            .filter_map(|layer| self.layers.get(layer))
            .fold(Value::Object(Default::default()), |merged, layer| {
                deep_merge(merged, layer.clone())
            })
    }

    fn set_value_at_path(data: &mut Value, path: &str, value: Value) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = parts.split_last() else {
            return Err(SecretGenError::Config("Empty path".to_string()));
        };

        let mut current = data;
        for part in parents {
            if !current.is_object() {
                *current = Value::Object(Default::default());
            }
            let Value::Object(map) = current else {
                secretgen_types::bug!("configuration node for '{}' is not an object", part);
            };
            current = map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Default::default()));
        }

        if !current.is_object() {
            *current = Value::Object(Default::default());
        }
        if let Value::Object(map) = current {
            map.insert(last.to_string(), value);
        }

        Ok(())
    }
}

/// Typed secretgen settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Secret store provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

impl Settings {
    /// Load settings from an optional file, overridden by the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Self::from_config(&config)
    }

    /// Build and validate settings from a layered configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings: Settings = serde_json::from_value(config.merged())
            .map_err(|e| SecretGenError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !ENDPOINT_PATTERN.is_match(&self.provider.endpoint) {
            return Err(SecretGenError::Config(format!(
                "endpoint ({:?}) doesn't match regexp {:?}",
                self.provider.endpoint,
                ENDPOINT_PATTERN.as_str()
            )));
        }

        if self.provider.timeout_secs == 0 {
            return Err(SecretGenError::Config("timeout_secs must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_layers() {
        let mut config = Config::default().with_defaults(serde_json::json!({"key": "default_value"}));

        config.layers.insert(
            ConfigLayer::Loaded,
            serde_json::json!({"key": "loaded_value"}),
        );

        let value: String = config.get("key").unwrap();
        assert_eq!(value, "loaded_value");

        config.set("key", "set_value").unwrap();
        let value: String = config.get("key").unwrap();
        assert_eq!(value, "set_value");
    }

    #[test]
    fn test_env_layer_wins_and_first_variable_is_used() {
        let mut config = Config::default();
        config.set("provider.project", "from-set").unwrap();

        config
            .apply_env(|var| match var {
                "GOOGLE_CLOUD_PROJECT" => Some("second".to_string()),
                "GCLOUD_PROJECT" => Some("third".to_string()),
                "GOOGLE_PROJECT" => Some(String::new()),
                _ => None,
            })
            .unwrap();

        let project: String = config.get("provider.project").unwrap();
        assert_eq!(project, "second");
    }

    #[test]
    fn test_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "provider:\n  project: acme\n  endpoint: http://localhost:9000/v1/\nlog:\n  level: DEBUG"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        let settings = Settings::from_config(&config).unwrap();

        assert_eq!(settings.provider.project.as_deref(), Some("acme"));
        assert_eq!(settings.provider.endpoint, "http://localhost:9000/v1/");
        assert_eq!(settings.provider.timeout_secs, 30);
        assert_eq!(settings.log.level, secretgen_types::LogLevel::Debug);
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.yml")).unwrap();
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(settings.provider, ProviderConfig::default());
    }

    #[test]
    fn test_endpoint_must_end_in_path_segment() {
        let mut config = Config::default();
        config.set("provider.endpoint", "https://secretmanager.googleapis.com").unwrap();
        assert!(matches!(Settings::from_config(&config), Err(SecretGenError::Config(_))));

        let mut config = Config::default();
        config.set("provider.endpoint", "https://example.com/v1/").unwrap();
        assert!(Settings::from_config(&config).is_ok());
    }
}
