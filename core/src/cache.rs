use crate::{
    Context, Error, Expiry, ExpiryWindow, ProvideCredential, Result, SigningCredential,
    DEFAULT_EXPIRY_WINDOW,
};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};

/// CredentialCache holds the last credential returned by a provider and only
/// asks the provider again once that credential is due for refresh.
///
/// There is no in-flight deduplication: concurrent callers that all observe an
/// expired entry will each fetch, and the last successful fetch wins.
#[derive(Clone)]
pub struct CredentialCache<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    window: Option<ExpiryWindow>,
    cached: Arc<Mutex<Option<(K, Expiry)>>>,
}

impl<K: SigningCredential> Debug for CredentialCache<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("provider", &self.provider)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl<K: SigningCredential> CredentialCache<K> {
    /// Create a new cache in front of `provider`.
    pub fn new(ctx: Context, provider: impl ProvideCredential<Credential = K>) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            window: None,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// Set the refresh window applied to every fetched credential.
    ///
    /// Without it the provider's [`ProvideCredential::expiry_window`] is
    /// used, falling back to [`DEFAULT_EXPIRY_WINDOW`].
    pub fn with_expiry_window(mut self, window: ExpiryWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// The refresh window applied to fetched credentials.
    pub fn expiry_window(&self) -> ExpiryWindow {
        self.window
            .or_else(|| self.provider.expiry_window())
            .unwrap_or(DEFAULT_EXPIRY_WINDOW)
    }

    /// Return the cached credential, fetching a new one if it is absent or
    /// due for refresh.
    pub async fn get(&self) -> Result<K> {
        {
            let cached = self.cached.lock().expect("lock poisoned");
            if let Some((cred, expiry)) = cached.as_ref() {
                if !expiry.is_expired() {
                    return Ok(cred.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Fetch a new credential regardless of the cached one.
    pub async fn refresh(&self) -> Result<K> {
        let cred = self
            .provider
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| {
                Error::credential_invalid("no credential found")
                    .with_context(format!("provider: {:?}", self.provider))
            })?;
        if !cred.is_valid() {
            return Err(Error::credential_invalid("provider returned an incomplete credential")
                .with_context(format!("provider: {:?}", self.provider)));
        }

        let window = self.expiry_window();
        let expiry = match cred.expires_at() {
            Some(expires_at) => Expiry::new(expires_at, window),
            None => Expiry::new(chrono::DateTime::<chrono::Utc>::MAX_UTC, window),
        };
        debug!("cached credential refresh at {:?}", expiry.refresh_at());

        *self.cached.lock().expect("lock poisoned") = Some((cred.clone(), expiry));
        Ok(cred)
    }

    /// Whether the next [`CredentialCache::get`] will fetch.
    pub fn is_expired(&self) -> bool {
        self.cached
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .map(|(_, expiry)| expiry.is_expired())
            .unwrap_or(true)
    }

    /// Drop the cached credential so the next `get` fetches.
    pub fn expire(&self) {
        *self.cached.lock().expect("lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{now, DateTime};
    use async_trait::async_trait;
    use chrono::TimeDelta;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct TestCredential {
        key: String,
        expires_at: Option<DateTime>,
    }

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.key.is_empty()
        }

        fn expires_at(&self) -> Option<DateTime> {
            self.expires_at
        }
    }

    #[derive(Debug)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        lifetime: Option<TimeDelta>,
        window: Option<ExpiryWindow>,
    }

    #[async_trait]
    impl ProvideCredential for CountingProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(TestCredential {
                key: format!("key-{n}"),
                expires_at: self.lifetime.map(|d| now() + d),
            }))
        }

        fn expiry_window(&self) -> Option<ExpiryWindow> {
            self.window
        }
    }

    #[derive(Debug)]
    struct EmptyProvider;

    #[async_trait]
    impl ProvideCredential for EmptyProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_cache_reuses_fresh_credential() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CredentialCache::new(
            Context::new(),
            CountingProvider {
                calls: calls.clone(),
                lifetime: Some(TimeDelta::hours(1)),
                window: None,
            },
        );

        assert!(cache.is_expired());
        assert_eq!(cache.get().await?.key, "key-0");
        assert_eq!(cache.get().await?.key, "key-0");
        assert!(!cache.is_expired());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.expire();
        assert_eq!(cache.get().await?.key, "key-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_cache_refetches_inside_window() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CredentialCache::new(
            Context::new(),
            CountingProvider {
                calls: calls.clone(),
                lifetime: Some(TimeDelta::minutes(5)),
                window: None,
            },
        )
        .with_expiry_window(ExpiryWindow::Fixed(std::time::Duration::from_secs(600)));

        cache.get().await?;
        cache.get().await?;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_cache_uses_provider_window() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CredentialCache::new(
            Context::new(),
            CountingProvider {
                calls: calls.clone(),
                lifetime: Some(TimeDelta::minutes(10)),
                window: Some(ExpiryWindow::Fixed(std::time::Duration::from_secs(3600))),
            },
        );
        assert_eq!(
            cache.expiry_window(),
            ExpiryWindow::Fixed(std::time::Duration::from_secs(3600))
        );

        cache.get().await?;
        cache.get().await?;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_cache_window_overrides_provider_window() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CredentialCache::new(
            Context::new(),
            CountingProvider {
                calls: calls.clone(),
                lifetime: Some(TimeDelta::minutes(10)),
                window: Some(ExpiryWindow::Fixed(std::time::Duration::from_secs(3600))),
            },
        )
        .with_expiry_window(ExpiryWindow::Fixed(std::time::Duration::ZERO));

        cache.get().await?;
        cache.get().await?;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_cache_keeps_non_expiring_credential() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CredentialCache::new(
            Context::new(),
            CountingProvider {
                calls: calls.clone(),
                lifetime: None,
                window: None,
            },
        );

        cache.get().await?;
        cache.get().await?;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_cache_errors_without_credential() {
        let cache = CredentialCache::new(Context::new(), EmptyProvider);

        let err = cache.get().await.expect_err("must fail");
        assert_eq!(err.kind(), crate::ErrorKind::CredentialInvalid);
        assert!(cache.is_expired());
    }
}
