//! # secretgen Secrets
//!
//! Generated secret resources and their lifecycle.
//!
//! Two kinds of material are supported:
//! - Random passwords built from a declarative character policy
//! - RSA private keys, with PEM and OpenSSH public keys derived on every read
//!
//! [`SecretLifecycle`] stores material as versions in any
//! [`SecretVersionStore`](secretgen_types::SecretVersionStore).
//!
//! ## Example
//!
//! ```no_run
//! use secretgen_secrets::{Declarations, SecretLifecycle};
//! # async fn run(store: std::sync::Arc<dyn secretgen_types::SecretVersionStore>) -> secretgen_types::Result<()> {
//! let declarations = Declarations::load("secretgen.yml")?;
//! let resource = declarations.resource("db-password", Some("acme"))?;
//!
//! let lifecycle = SecretLifecycle::new(store);
//! let state = lifecycle.create(&resource).await?;
//! println!("stored as {}", state.id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod declaration;
pub mod encoding;
pub mod generators;
pub mod lifecycle;
pub mod resource;

pub use declaration::{Declarations, ResourceDeclaration};
pub use lifecycle::{plan, SecretLifecycle};
pub use resource::{
    ChangeAction, GeneratedPassword, GeneratedRsaKey, GeneratedSecret, ResourceSettings,
    SecretResource,
};
