//! Resolve temporary AWS IAM credentials for S3 compatible storage.
//!
//! [`IamCredentialProvider`] looks at the runtime environment and picks one
//! source, in this order:
//!
//! 1. web identity token exchanged with STS (`AWS_WEB_IDENTITY_TOKEN_FILE`)
//! 2. ECS task endpoint (`AWS_CONTAINER_CREDENTIALS_RELATIVE_URI`)
//! 3. EKS pod identity agent (`AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE` and
//!    `AWS_CONTAINER_CREDENTIALS_FULL_URI`)
//! 4. container endpoint on a loopback host (`AWS_CONTAINER_CREDENTIALS_FULL_URI`)
//! 5. EC2 instance metadata service
//!
//! ## Example
//!
//! ```no_run
//! use iamcred_aws::IamCredentialProvider;
//! use iamcred_core::{Context, CredentialCache, OsEnv};
//! use iamcred_file_read_tokio::TokioFileRead;
//! use iamcred_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> iamcred_core::Result<()> {
//! let ctx = Context::new()
//!     .with_file_read(TokioFileRead)
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! let cache = CredentialCache::new(ctx, IamCredentialProvider::default());
//! let cred = cache.get().await?;
//! println!("access key: {}", cred.access_key_id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Environment variable names, endpoints and protocol constants.
#[allow(missing_docs)]
pub mod constants;

mod config;
pub use config::Config;
pub use config::CredentialSource;

mod credential;
pub use credential::Credential;
pub use credential::RawFetchResponse;
pub use credential::SignerType;

mod loopback;
pub use loopback::is_loopback;

mod provide_credential;
pub use provide_credential::*;

#[cfg(test)]
mod testing;
