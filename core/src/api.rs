use crate::time::DateTime;
use crate::{Context, ExpiryWindow, Result};
use std::fmt::Debug;

/// SigningCredential is the trait implemented by every credential a provider
/// hands out.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential carries the fields needed to sign requests.
    fn is_valid(&self) -> bool;

    /// The instant after which the source no longer honours this credential.
    ///
    /// `None` means the credential never expires.
    fn expires_at(&self) -> Option<DateTime> {
        None
    }
}

/// ProvideCredential is the trait used to fetch credentials from a source.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Fetch a fresh credential.
    ///
    /// Returns `Ok(None)` when this provider has nothing to offer in the
    /// current environment.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;

    /// The refresh window this provider wants applied to its credentials.
    ///
    /// `None` leaves the choice to the caller.
    fn expiry_window(&self) -> Option<ExpiryWindow> {
        None
    }
}
