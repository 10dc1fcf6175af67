//! Error types for secretgen operations.

use thiserror::Error;

/// The main error type for secretgen operations.
///
/// The first group of variants is the lifecycle taxonomy: every failure of a
/// generator, the key codecs or the secret store is reported through one of
/// them, together with the resource identity when it is known.
#[derive(Error, Debug)]
pub enum SecretGenError {
    /// Bad generation parameters (caller configuration error, never retried)
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Cryptographic generation or validation failure
    #[error("Generation error: {0}")]
    Generation(String),

    /// Stored key material is malformed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Adding a version to the secret store failed
    #[error("Failed to add version to secret '{parent}': {message}")]
    StoreWrite {
        /// Parent secret the version was written to
        parent: String,
        /// Underlying store failure
        message: String,
    },

    /// Accessing a version in the secret store failed
    #[error("Failed to access secret version '{version}': {message}")]
    StoreRead {
        /// Version that could not be accessed
        version: String,
        /// Underlying store failure
        message: String,
    },

    /// Disabling a version failed; the version was left untouched
    #[error("Failed to disable secret version '{version}': {message}")]
    StoreDelete {
        /// Version that could not be disabled
        version: String,
        /// Underlying store failure
        message: String,
    },

    /// The version was disabled but destroying it failed
    #[error("Secret version '{version}' was disabled but not destroyed: {message}")]
    PartialDelete {
        /// Version left in the disabled state
        version: String,
        /// Underlying store failure
        message: String,
    },

    /// Raw store or transport failure reported by an adapter
    #[error("Secret store error: {0}")]
    Store(String),

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal bug - should never happen in production
    #[error("Bug detected: {0}\n\nThis is an internal error. Please report this issue.")]
    Bug(String),
}

impl SecretGenError {
    /// Message of a store failure, without the variant prefix.
    ///
    /// Used by the lifecycle controller when it re-wraps an adapter error with
    /// the operation that was running.
    pub fn store_message(&self) -> String {
        match self {
            SecretGenError::Store(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Prefix a generation or decode failure with the version it concerns.
    ///
    /// Other variants already carry their identity and pass through.
    pub fn for_version(self, version: impl std::fmt::Display) -> Self {
        match self {
            SecretGenError::Decode(message) => {
                SecretGenError::Decode(format!("secret version '{}': {}", version, message))
            }
            SecretGenError::Generation(message) => {
                SecretGenError::Generation(format!("secret version '{}': {}", version, message))
            }
            other => other,
        }
    }

    /// Whether the error leaves a resource neither live nor fully destroyed.
    pub fn is_partial(&self) -> bool {
        matches!(self, SecretGenError::PartialDelete { .. })
    }
}

/// A specialized Result type for secretgen operations.
pub type Result<T> = std::result::Result<T, SecretGenError>;

/// Helper macro to create and return a SecretGenError::Bug
///
/// This should be used for conditions that should never occur
/// in normal operation.
#[macro_export]
macro_rules! bug {
    ($msg:expr) => {
        return Err($crate::SecretGenError::Bug($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::SecretGenError::Bug(format!($fmt, $($arg)*)))
    };
}

/// Helper macro to bail out with a SecretGenError
///
/// # Example
///
/// ```ignore
/// if length < required {
///     bail!(InvalidPolicy, "length {} is shorter than {}", length, required);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::SecretGenError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::SecretGenError::$variant(format!($fmt, $($arg)*)))
    };
}
