//! # secretgen Types
//!
//! Core types, traits, and enums shared across all secretgen crates.
//!
//! This crate provides the fundamental building blocks for provisioning
//! generated secrets into a versioned secret store, including:
//!
//! - Validated secret names and opaque version ids
//! - Common enums for log levels and resource kinds
//! - The secret version store capability trait
//! - The visible state of a managed resource
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use secretgen_types::{ResourceKind, SecretName};
//!
//! let name = SecretName::new("projects/acme/secrets/db").unwrap();
//! assert_eq!(name.secret_id(), "db");
//!
//! let kind: ResourceKind = "rsa_key".parse().unwrap();
//! assert_eq!(kind, ResourceKind::RsaKey);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod enums;
pub mod traits;
pub mod config;
pub mod state;

// Re-export common types for convenience
pub use errors::{SecretGenError, Result};
pub use identifiers::{SecretName, VersionId};
pub use enums::{LogLevel, ResourceKind};
pub use traits::SecretVersionStore;
pub use state::{DeleteOutcome, ResourceState};
