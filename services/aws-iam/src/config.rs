// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::*;
use crate::provide_credential::sts_endpoint;
use iamcred_core::utils::Redact;
use iamcred_core::Context;
use std::fmt::{Debug, Display, Formatter};

/// Config carries the values that decide where IAM credentials come from.
///
/// Fields left as `None` (or set to an empty string) are treated as unset.
/// Call [`Config::from_env`] to let non-empty environment variables override
/// them.
#[derive(Clone, Default)]
pub struct Config {
    /// Custom endpoint for the selected source.
    ///
    /// Replaces the STS endpoint, the container endpoint or the instance
    /// metadata endpoint, depending on which source is selected.
    pub endpoint: Option<String>,
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    pub region: Option<String>,
    /// Token sent as `Authorization` to container credential endpoints.
    ///
    /// - env value: [`AWS_CONTAINER_AUTHORIZATION_TOKEN`]
    pub container_authorization_token: Option<String>,
    /// File holding the pod identity token.
    ///
    /// - env value: [`AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE`]
    pub container_authorization_token_file: Option<String>,
    /// Path appended to the ECS credential endpoint.
    ///
    /// - env value: [`AWS_CONTAINER_CREDENTIALS_RELATIVE_URI`]
    pub container_credentials_relative_uri: Option<String>,
    /// Full container credential endpoint.
    ///
    /// - env value: [`AWS_CONTAINER_CREDENTIALS_FULL_URI`]
    pub container_credentials_full_uri: Option<String>,
    /// File holding the web identity token.
    ///
    /// - env value: [`AWS_WEB_IDENTITY_TOKEN_FILE`]
    pub web_identity_token_file: Option<String>,
    /// Role to assume with the web identity token.
    ///
    /// - env value: [`AWS_ROLE_ARN`]
    pub role_arn: Option<String>,
    /// Session name used when assuming a role.
    ///
    /// - env value: [`AWS_ROLE_SESSION_NAME`]
    pub role_session_name: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field(
                "container_authorization_token",
                &Redact::from(&self.container_authorization_token),
            )
            .field(
                "container_authorization_token_file",
                &self.container_authorization_token_file,
            )
            .field(
                "container_credentials_relative_uri",
                &self.container_credentials_relative_uri,
            )
            .field(
                "container_credentials_full_uri",
                &self.container_credentials_full_uri,
            )
            .field("web_identity_token_file", &self.web_identity_token_file)
            .field("role_arn", &self.role_arn)
            .field("role_session_name", &self.role_session_name)
            .finish()
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|v| !v.is_empty())
}

impl Config {
    /// Load config from env, overriding every field whose env value is
    /// non-empty.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let fields = [
            (
                &mut self.container_authorization_token,
                AWS_CONTAINER_AUTHORIZATION_TOKEN,
            ),
            (
                &mut self.container_authorization_token_file,
                AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE,
            ),
            (
                &mut self.container_credentials_relative_uri,
                AWS_CONTAINER_CREDENTIALS_RELATIVE_URI,
            ),
            (
                &mut self.container_credentials_full_uri,
                AWS_CONTAINER_CREDENTIALS_FULL_URI,
            ),
            (&mut self.web_identity_token_file, AWS_WEB_IDENTITY_TOKEN_FILE),
            (&mut self.role_arn, AWS_ROLE_ARN),
            (&mut self.role_session_name, AWS_ROLE_SESSION_NAME),
            (&mut self.region, AWS_REGION),
        ];

        for (field, key) in fields {
            if let Some(v) = ctx.env_var_non_empty(key) {
                *field = Some(v);
            }
        }

        self
    }

    /// Pick the credential source, first match wins:
    ///
    /// 1. web identity token file
    /// 2. container credentials relative uri
    /// 3. pod identity token file together with container credentials full uri
    /// 4. container credentials full uri
    /// 5. instance metadata service
    pub fn source(&self) -> CredentialSource {
        let endpoint = non_empty(&self.endpoint);

        if let Some(token_file) = non_empty(&self.web_identity_token_file) {
            return CredentialSource::WebIdentity {
                endpoint: endpoint
                    .map(str::to_string)
                    .unwrap_or_else(|| sts_endpoint(non_empty(&self.region))),
                token_file: token_file.to_string(),
            };
        }

        if let Some(relative_uri) = non_empty(&self.container_credentials_relative_uri) {
            return CredentialSource::ContainerRelativeUri {
                endpoint: endpoint
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{DEFAULT_ECS_ROLE_ENDPOINT}{relative_uri}")),
            };
        }

        let full_uri = non_empty(&self.container_credentials_full_uri);
        if let (Some(token_file), Some(full_uri)) =
            (non_empty(&self.container_authorization_token_file), full_uri)
        {
            return CredentialSource::PodIdentity {
                endpoint: full_uri.to_string(),
                token_file: token_file.to_string(),
            };
        }

        if let Some(full_uri) = full_uri {
            // An explicit endpoint comes from trusted config, the full uri
            // may come from anywhere in the environment.
            return match endpoint {
                Some(endpoint) => CredentialSource::ContainerFullUri {
                    endpoint: endpoint.to_string(),
                    require_loopback: false,
                },
                None => CredentialSource::ContainerFullUri {
                    endpoint: full_uri.to_string(),
                    require_loopback: true,
                },
            };
        }

        CredentialSource::InstanceProfile {
            endpoint: endpoint.unwrap_or(DEFAULT_IAM_ROLE_ENDPOINT).to_string(),
        }
    }

    pub(crate) fn container_authorization_token(&self) -> &str {
        non_empty(&self.container_authorization_token).unwrap_or_default()
    }

    pub(crate) fn role_arn(&self) -> Option<&str> {
        non_empty(&self.role_arn)
    }

    pub(crate) fn role_session_name(&self) -> &str {
        non_empty(&self.role_session_name).unwrap_or(DEFAULT_ROLE_SESSION_NAME)
    }
}

/// The source selected by [`Config::source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Exchange a web identity token with STS.
    WebIdentity {
        /// STS endpoint.
        endpoint: String,
        /// File holding the web identity token.
        token_file: String,
    },
    /// Fetch from the ECS task credential endpoint.
    ContainerRelativeUri {
        /// Credential endpoint.
        endpoint: String,
    },
    /// Fetch from the pod identity agent with a token read from a file.
    PodIdentity {
        /// Credential endpoint.
        endpoint: String,
        /// File holding the pod identity token.
        token_file: String,
    },
    /// Fetch from a full container credential uri.
    ContainerFullUri {
        /// Credential endpoint.
        endpoint: String,
        /// Whether the endpoint must resolve to loopback addresses only.
        require_loopback: bool,
    },
    /// Fetch from the instance metadata service.
    InstanceProfile {
        /// Metadata service endpoint.
        endpoint: String,
    },
}

impl Display for CredentialSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::WebIdentity { endpoint, .. } => {
                write!(f, "web identity via {endpoint}")
            }
            CredentialSource::ContainerRelativeUri { endpoint } => {
                write!(f, "container relative uri {endpoint}")
            }
            CredentialSource::PodIdentity { endpoint, .. } => {
                write!(f, "pod identity via {endpoint}")
            }
            CredentialSource::ContainerFullUri { endpoint, .. } => {
                write!(f, "container full uri {endpoint}")
            }
            CredentialSource::InstanceProfile { endpoint } => {
                write!(f, "instance profile via {endpoint}")
            }
        }
    }
}
