//! Core components for resolving short-lived cloud credentials.
//!
//! This crate provides the foundational types and traits shared by the iamcred
//! crates.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending and environment access
//! - **ProvideCredential**: The trait every credential source implements
//! - **Expiry** and **CredentialCache**: Track when a credential must be fetched again
//!
//! ## Example
//!
//! ```no_run
//! use iamcred_core::{Context, CredentialCache, ProvideCredential, SigningCredential, Result};
//! use iamcred_core::time::{now, DateTime};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     token: String,
//!     expires_at: DateTime,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.token.is_empty()
//!     }
//!
//!     fn expires_at(&self) -> Option<DateTime> {
//!         Some(self.expires_at)
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             token: "token".to_string(),
//!             expires_at: now() + chrono::TimeDelta::hours(1),
//!         }))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let cache = CredentialCache::new(Context::new(), MyProvider);
//! let cred = cache.get().await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod context;
pub use context::{Context, Env, FileRead, HttpSend, OsEnv, StaticEnv};
mod api;
pub use api::{ProvideCredential, SigningCredential};
mod expiry;
pub use expiry::{Expiry, ExpiryWindow, DEFAULT_EXPIRY_WINDOW};
mod cache;
pub use cache::CredentialCache;
