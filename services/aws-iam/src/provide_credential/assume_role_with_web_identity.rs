use crate::constants::STS_API_VERSION;
use crate::provide_credential::utils::parse_sts_error;
use crate::{Credential, SignerType};
use bytes::Bytes;
use http::{Method, StatusCode};
use iamcred_core::time::parse_rfc3339;
use iamcred_core::{utils::Redact, Context, Error, Result};
use log::debug;
use quick_xml::de;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use url::Url;

const OPERATION: &str = "AssumeRoleWithWebIdentity";

/// Exchange the web identity token stored in `token_file` for temporary
/// credentials at the STS `endpoint`.
///
/// `RoleArn` is only sent when `role_arn` is set, STS compatible servers
/// such as MinIO derive the role from the token.
pub async fn assume_role_with_web_identity(
    ctx: &Context,
    endpoint: &str,
    token_file: &str,
    role_arn: Option<&str>,
    session_name: &str,
) -> Result<Credential> {
    let token = ctx.file_read_as_string(token_file).await.map_err(|e| {
        Error::config_invalid("failed to read web identity token file")
            .with_source(e)
            .with_context(format!("file: {token_file}"))
            .with_context("hint: check if the token file exists and is readable")
    })?;
    if token.is_empty() {
        return Err(Error::config_invalid("web identity token file is empty")
            .with_context(format!("file: {token_file}")));
    }

    let mut url = Url::parse(endpoint).map_err(|e| {
        Error::config_invalid("invalid STS endpoint")
            .with_source(e)
            .with_context(format!("endpoint: {endpoint}"))
    })?;
    // Serializer is not Send, it must be dropped before the first await.
    let query = {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("Action", OPERATION)
            .append_pair("Version", STS_API_VERSION)
            .append_pair("WebIdentityToken", &token);
        if let Some(role_arn) = role_arn {
            query.append_pair("RoleArn", role_arn);
        }
        query.append_pair("RoleSessionName", session_name);
        query.finish()
    };
    url.set_query(Some(&query));

    let req = http::Request::builder()
        .method(Method::GET)
        .uri(url.as_str())
        .body(Bytes::new())
        .map_err(|e| {
            Error::request_invalid("failed to build STS AssumeRoleWithWebIdentity request")
                .with_source(e)
                .with_context(format!("endpoint: {endpoint}"))
        })?;

    debug!("assuming role {role_arn:?} with web identity via {endpoint}");
    let resp = ctx.http_send_as_string(req).await.map_err(|e| {
        e.with_context(format!("operation: {OPERATION}"))
            .with_context(format!("endpoint: {endpoint}"))
    })?;

    let status = resp.status();
    let body = resp.into_body();
    if status != StatusCode::OK {
        let err = parse_sts_error(OPERATION, status, &body)
            .with_context(format!("session_name: {session_name}"))
            .with_context(format!("token_file: {token_file}"));
        return Err(match role_arn {
            Some(role_arn) => err.with_context(format!("role_arn: {role_arn}")),
            None => err,
        });
    }

    let resp: AssumeRoleWithWebIdentityResponse = de::from_str(&body).map_err(|e| {
        Error::unexpected("failed to parse STS AssumeRoleWithWebIdentity response")
            .with_source(e)
            .with_context(format!("response_length: {}", body.len()))
    })?;
    let resp_cred = resp.result.credentials;

    let expires_in = parse_rfc3339(&resp_cred.expiration).map_err(|e| {
        Error::unexpected("failed to parse web identity credential expiration")
            .with_source(e)
            .with_context(format!("expiration_value: {}", resp_cred.expiration))
    })?;

    Ok(Credential {
        access_key_id: resp_cred.access_key_id,
        secret_access_key: resp_cred.secret_access_key,
        session_token: Some(resp_cred.session_token).filter(|v| !v.is_empty()),
        expires_in: Some(expires_in),
        signer_type: SignerType::V4,
    })
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleWithWebIdentityResponse {
    #[serde(rename = "AssumeRoleWithWebIdentityResult")]
    result: AssumeRoleWithWebIdentityResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleWithWebIdentityResult {
    credentials: WebIdentityCredentials,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct WebIdentityCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
}

impl Debug for WebIdentityCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebIdentityCredentials")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("expiration", &self.expiration)
            .finish()
    }
}
