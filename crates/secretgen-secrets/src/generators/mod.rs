//! Generators for secret material.
//!
//! Each generator owns its randomness: callers either pass an explicit
//! generator or let the convenience function seed one from the OS.

pub mod password;
pub mod rsa;

pub use self::password::{generate_password, PasswordPolicy, RequiredGroup};
pub use self::rsa::{generate_key_pair, KeyPair, RsaKeyPolicy};
