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

use iamcred_core::time::{parse_rfc3339, DateTime};
use iamcred_core::utils::Redact;
use iamcred_core::{Error, Result, SigningCredential};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// The request signing scheme a credential is meant for.
///
/// IAM sources only hand out Signature V4 credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum SignerType {
    /// AWS Signature Version 4.
    #[default]
    V4,
}

/// Credential that holds the access_key and secret_key.
///
/// Every credential resolved from an IAM source is temporary: it always has a
/// session token and an expiration.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for aws services.
    pub access_key_id: String,
    /// Secret access key for aws services.
    pub secret_access_key: String,
    /// Session token for aws services.
    pub session_token: Option<String>,
    /// Expiration time for this credential.
    pub expires_in: Option<DateTime>,
    /// Signing scheme to use with this credential.
    pub signer_type: SignerType,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("expires_in", &self.expires_in)
            .field("signer_type", &self.signer_type)
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }

    fn expires_at(&self) -> Option<DateTime> {
        self.expires_in
    }
}

/// RawFetchResponse is the JSON payload returned by the instance metadata
/// service and by container credential endpoints.
///
/// `code` and `message` are only filled in by the instance metadata service.
/// Other fields such as `LastUpdated` and `Type` are ignored.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawFetchResponse {
    /// RFC 3339 expiration.
    pub expiration: String,
    /// Access key id.
    #[serde(alias = "AccessKeyID")]
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token.
    pub token: String,

    /// `Success` when the payload is valid.
    pub code: String,
    /// Failure reason reported by the source.
    pub message: String,
}

impl Debug for RawFetchResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFetchResponse")
            .field("expiration", &self.expiration)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("token", &Redact::from(&self.token))
            .field("code", &self.code)
            .field("message", &self.message)
            .finish()
    }
}

impl RawFetchResponse {
    /// Decode a payload from its JSON body.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            Error::unexpected("failed to parse credential response")
                .with_source(e)
                .with_context(format!("response_length: {}", content.len()))
        })
    }

    /// Normalize the payload into a [`Credential`] signed with Signature V4.
    pub fn into_credential(self) -> Result<Credential> {
        let expires_in = parse_rfc3339(&self.expiration).map_err(|e| {
            Error::unexpected("failed to parse credential expiration")
                .with_source(e)
                .with_context(format!("expiration_value: {}", self.expiration))
        })?;

        Ok(Credential {
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            session_token: Some(self.token).filter(|v| !v.is_empty()),
            expires_in: Some(expires_in),
            signer_type: SignerType::V4,
        })
    }
}
