//! Random password generation.

use rand::rngs::{OsRng, SmallRng};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use secretgen_types::{bail, SecretGenError, Result};
use serde::{Deserialize, Serialize};

/// Default character set for passwords.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default password length.
pub const DEFAULT_LENGTH: usize = 32;

/// Default count of a required group when none is given.
pub const DEFAULT_REQUIRED_COUNT: usize = 32;

/// A rule mandating `count` characters drawn from `alphabet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredGroup {
    /// Number of characters drawn from this group
    #[serde(default = "default_required_count")]
    pub count: usize,
    /// Characters this group draws from
    pub alphabet: String,
}

impl RequiredGroup {
    /// Create a required group.
    pub fn new(count: usize, alphabet: impl Into<String>) -> Self {
        Self {
            count,
            alphabet: alphabet.into(),
        }
    }
}

/// Declarative password policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Total number of characters
    #[serde(default = "default_length")]
    pub length: usize,
    /// Characters used to fill whatever the required groups leave over
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    /// Groups that must be represented, in order
    #[serde(default)]
    pub required: Vec<RequiredGroup>,
}

fn default_required_count() -> usize {
    DEFAULT_REQUIRED_COUNT
}

fn default_length() -> usize {
    DEFAULT_LENGTH
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH, DEFAULT_ALPHABET)
    }
}

impl PasswordPolicy {
    /// Policy without required groups.
    pub fn new(length: usize, alphabet: impl Into<String>) -> Self {
        Self {
            length,
            alphabet: alphabet.into(),
            required: Vec::new(),
        }
    }

    /// Add a required group.
    pub fn require(mut self, count: usize, alphabet: impl Into<String>) -> Self {
        self.required.push(RequiredGroup::new(count, alphabet));
        self
    }

    /// Sum of all required group counts, `None` on overflow.
    pub fn required_count(&self) -> Option<usize> {
        self.required
            .iter()
            .try_fold(0usize, |total, group| total.checked_add(group.count))
    }

    /// Check the policy can be satisfied.
    ///
    /// # Errors
    ///
    /// Returns [`SecretGenError::InvalidPolicy`] when the required groups ask
    /// for more characters than `length`, or when an alphabet that has to be
    /// drawn from is empty.
    pub fn validate(&self) -> Result<()> {
        for (index, group) in self.required.iter().enumerate() {
            if group.alphabet.is_empty() {
                bail!(InvalidPolicy, "required group {} has an empty alphabet", index);
            }
        }

        let required = match self.required_count() {
            Some(required) if required <= self.length => required,
            Some(required) => bail!(
                InvalidPolicy,
                "required groups need {} characters but length is {}",
                required,
                self.length
            ),
            None => bail!(InvalidPolicy, "required group counts overflow"),
        };

        if self.length > required && self.alphabet.is_empty() {
            bail!(
                InvalidPolicy,
                "alphabet is empty but {} characters must be drawn from it",
                self.length - required
            );
        }

        Ok(())
    }
}

/// Generate a password from `policy` using `rng`.
///
/// Each required group contributes exactly `count` characters, the rest come
/// from the default alphabet, and the whole sequence is then shuffled so the
/// required characters can land anywhere.
pub fn generate<R: Rng + ?Sized>(policy: &PasswordPolicy, rng: &mut R) -> Result<String> {
    policy.validate()?;

    let mut password: Vec<char> = Vec::with_capacity(policy.length);
    let mut remaining = policy.length;

    for group in &policy.required {
        draw(&mut password, &group.alphabet, group.count, rng);
        remaining -= group.count;
    }
    draw(&mut password, &policy.alphabet, remaining, rng);

    password.shuffle(rng);
    Ok(password.into_iter().collect())
}

/// Generate a password with a freshly seeded generator.
///
/// A fast generator is seeded from the operating system's CSPRNG for every
/// call, so concurrent generations never share state.
pub fn generate_password(policy: &PasswordPolicy) -> Result<String> {
    let mut rng = SmallRng::from_rng(OsRng)
        .map_err(|e| SecretGenError::Generation(format!("Failed to seed random generator: {}", e)))?;
    generate(policy, &mut rng)
}

fn draw<R: Rng + ?Sized>(out: &mut Vec<char>, alphabet: &str, count: usize, rng: &mut R) {
    if count == 0 {
        return;
    }
    let chars: Vec<char> = alphabet.chars().collect();
    for _ in 0..count {
        out.push(chars[rng.gen_range(0..chars.len())]);
    }
}
