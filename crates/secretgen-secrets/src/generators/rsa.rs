//! RSA key pair generation.

use crate::encoding::{encode_private_key_pem, encode_public_key_pem, encode_public_key_ssh};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::RsaPrivateKey;
use secretgen_types::{bail, SecretGenError, Result};
use serde::{Deserialize, Serialize};

/// Default modulus size in bits.
pub const DEFAULT_KEY_SIZE: usize = 4096;

/// Smallest accepted modulus size.
pub const MIN_KEY_SIZE: usize = 1024;

/// Largest accepted modulus size.
pub const MAX_KEY_SIZE: usize = 16384;

/// RSA key policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaKeyPolicy {
    /// Modulus size in bits
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    DEFAULT_KEY_SIZE
}

impl Default for RsaKeyPolicy {
    fn default() -> Self {
        Self {
            size: DEFAULT_KEY_SIZE,
        }
    }
}

impl RsaKeyPolicy {
    /// Policy for a key of `size` bits.
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Check the modulus size is within bounds.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_KEY_SIZE..=MAX_KEY_SIZE).contains(&self.size) {
            bail!(
                InvalidPolicy,
                "key size {} is outside {}..={}",
                self.size,
                MIN_KEY_SIZE,
                MAX_KEY_SIZE
            );
        }
        Ok(())
    }
}

/// Encoded key material for a freshly generated key.
#[derive(Clone)]
pub struct KeyPair {
    /// PKCS#8 body under an `RSA PRIVATE KEY` PEM label
    pub private_key_pem: String,
    /// SubjectPublicKeyInfo PEM
    pub public_key_pem: String,
    /// `authorized_keys` line
    pub public_key_ssh: String,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key_pem", &"<redacted>")
            .field("public_key_pem", &self.public_key_pem)
            .field("public_key_ssh", &self.public_key_ssh)
            .finish()
    }
}

/// Generate and validate a private key using `rng`.
pub fn generate_private_key<R: RngCore + CryptoRng>(
    policy: &RsaKeyPolicy,
    rng: &mut R,
) -> Result<RsaPrivateKey> {
    policy.validate()?;

    let key = RsaPrivateKey::new(rng, policy.size)
        .map_err(|e| SecretGenError::Generation(format!("Failed to generate RSA key: {}", e)))?;
    key.validate()
        .map_err(|e| SecretGenError::Generation(format!("Generated RSA key is invalid: {}", e)))?;

    Ok(key)
}

/// Generate a key pair from the operating system's CSPRNG and encode it.
pub fn generate_key_pair(policy: &RsaKeyPolicy) -> Result<KeyPair> {
    let key = generate_private_key(policy, &mut OsRng)?;
    encode_key_pair(&key)
}

/// Encode all three representations of `key`.
pub fn encode_key_pair(key: &RsaPrivateKey) -> Result<KeyPair> {
    let public = key.to_public_key();
    Ok(KeyPair {
        private_key_pem: encode_private_key_pem(key)?,
        public_key_pem: encode_public_key_pem(&public)?,
        public_key_ssh: encode_public_key_ssh(&public),
    })
}
