use crate::provide_credential::{
    assume_role_with_web_identity, fetch_container_credentials,
    fetch_instance_profile_credentials, fetch_pod_identity_credentials,
};
use crate::{is_loopback, Config, Credential, CredentialSource};
use async_trait::async_trait;
use iamcred_core::{
    Context, Error, Expiry, ExpiryWindow, HttpSend, ProvideCredential, Result,
    DEFAULT_EXPIRY_WINDOW,
};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// IamCredentialProvider resolves temporary credentials from the IAM source
/// the runtime environment points at.
///
/// Sources are tried in a fixed order, see [`Config::source`]. Environment
/// values override the config on every call.
#[derive(Clone, Default)]
pub struct IamCredentialProvider {
    config: Config,
    http_send: Option<Arc<dyn HttpSend>>,
    expiry_window: Option<ExpiryWindow>,
}

impl Debug for IamCredentialProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamCredentialProvider")
            .field("config", &self.config)
            .field("http_send", &self.http_send)
            .field("expiry_window", &self.expiry_window)
            .finish()
    }
}

impl IamCredentialProvider {
    /// Create a provider that queries `endpoint`, or the default endpoint of
    /// the selected source when `endpoint` is empty.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self::default().with_config(Config {
            endpoint: Some(endpoint).filter(|v| !v.is_empty()),
            ..Default::default()
        })
    }

    /// Replace the config.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Send requests with `http_send` instead of the context's client.
    pub fn with_http_send(mut self, http_send: impl HttpSend) -> Self {
        self.http_send = Some(Arc::new(http_send));
        self
    }

    /// Use `window` instead of [`DEFAULT_EXPIRY_WINDOW`] for the returned
    /// expiry.
    ///
    /// A [`CredentialCache`](iamcred_core::CredentialCache) in front of this
    /// provider applies the same window.
    pub fn with_expiry_window(mut self, window: ExpiryWindow) -> Self {
        self.expiry_window = Some(window);
        self
    }

    /// Resolve a credential together with its expiry state.
    pub async fn resolve(&self, ctx: &Context) -> Result<(Credential, Expiry)> {
        let ctx = match &self.http_send {
            Some(http_send) => ctx.clone().with_shared_http_send(http_send.clone()),
            None => ctx.clone(),
        };
        let config = self.config.clone().from_env(&ctx);
        let source = config.source();
        debug!("resolving IAM credentials from {source}");

        let cred = match source {
            CredentialSource::WebIdentity {
                endpoint,
                token_file,
            } => {
                assume_role_with_web_identity(
                    &ctx,
                    &endpoint,
                    &token_file,
                    config.role_arn(),
                    config.role_session_name(),
                )
                .await?
            }
            CredentialSource::ContainerRelativeUri { endpoint } => {
                fetch_container_credentials(
                    &ctx,
                    &endpoint,
                    config.container_authorization_token(),
                )
                .await?
                .into_credential()?
            }
            CredentialSource::PodIdentity {
                endpoint,
                token_file,
            } => {
                fetch_pod_identity_credentials(&ctx, &endpoint, &token_file)
                    .await?
                    .into_credential()?
            }
            CredentialSource::ContainerFullUri {
                endpoint,
                require_loopback,
            } => {
                if require_loopback && !is_loopback(&endpoint).await? {
                    return Err(
                        Error::config_invalid("uri host is not a loopback address")
                            .with_context(format!("uri: {endpoint}")),
                    );
                }
                fetch_container_credentials(
                    &ctx,
                    &endpoint,
                    config.container_authorization_token(),
                )
                .await?
                .into_credential()?
            }
            CredentialSource::InstanceProfile { endpoint } => {
                fetch_instance_profile_credentials(&ctx, &endpoint)
                    .await?
                    .into_credential()?
            }
        };

        let window = self.expiry_window.unwrap_or(DEFAULT_EXPIRY_WINDOW);
        let expiry = match cred.expires_in {
            Some(expires_at) => Expiry::new(expires_at, window),
            None => Expiry::default(),
        };
        Ok((cred, expiry))
    }
}

#[async_trait]
impl ProvideCredential for IamCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let (cred, _) = self.resolve(ctx).await?;
        Ok(Some(cred))
    }

    fn expiry_window(&self) -> Option<ExpiryWindow> {
        self.expiry_window
    }
}
