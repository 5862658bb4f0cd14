use crate::constants::*;
use crate::provide_credential::utils::status_error;
use crate::RawFetchResponse;
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{Method, StatusCode};
use iamcred_core::{Context, Error, Result};
use log::{debug, warn};
use url::Url;

/// Fetch an IMDSv2 session token.
///
/// The request is bounded by [`IMDS_TOKEN_TIMEOUT`]. Running out of time
/// returns an error of kind [`ErrorKind::Timeout`](iamcred_core::ErrorKind::Timeout),
/// which means the host does not speak IMDSv2.
pub async fn fetch_imds_token(ctx: &Context, endpoint: &str) -> Result<String> {
    let url = format!("{endpoint}{IMDS_TOKEN_PATH}");
    let req = http::Request::builder()
        .uri(&url)
        .method(Method::PUT)
        .header(CONTENT_LENGTH, "0")
        .header(X_AWS_EC2_METADATA_TOKEN_TTL_SECONDS, IMDS_TOKEN_TTL)
        .body(Bytes::new())
        .map_err(|e| {
            Error::request_invalid("failed to build IMDS token request")
                .with_source(e)
                .with_context(format!("url: {url}"))
        })?;

    let resp = match tokio::time::timeout(IMDS_TOKEN_TIMEOUT, ctx.http_send_as_string(req)).await
    {
        Ok(resp) => resp.map_err(|e| e.with_context(format!("url: {url}")))?,
        Err(_) => {
            return Err(Error::timeout("IMDS token request timed out")
                .with_context(format!("url: {url}"))
                .with_context(format!("timeout: {IMDS_TOKEN_TIMEOUT:?}")))
        }
    };

    if resp.status() != StatusCode::OK {
        return Err(status_error(resp.status())
            .with_context("operation: fetch_imds_token")
            .with_context(format!("url: {url}")));
    }

    Ok(resp.into_body())
}

/// Split a role listing into role names, one per line.
pub fn parse_role_names(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fetch the credentials of the role attached to this instance.
///
/// The IMDSv2 token handshake runs first. When it times out or is canceled
/// the requests are sent without a token (IMDSv1); any other failure aborts.
pub async fn fetch_instance_profile_credentials(
    ctx: &Context,
    endpoint: &str,
) -> Result<RawFetchResponse> {
    let token = match fetch_imds_token(ctx, endpoint).await {
        Ok(token) => Some(token),
        Err(e) if e.is_timeout_or_canceled() => {
            warn!("IMDSv2 token unavailable, falling back to IMDSv1: {e}");
            None
        }
        Err(e) => return Err(e),
    };

    let mut url = Url::parse(endpoint).map_err(|e| {
        Error::config_invalid("invalid instance metadata endpoint")
            .with_source(e)
            .with_context(format!("endpoint: {endpoint}"))
    })?;
    url.set_path(IMDS_SECURITY_CREDENTIALS_PATH);

    // List all roles that the instance has.
    let content = imds_get(ctx, &url, token.as_deref(), "list_instance_profiles").await?;
    let role_names = parse_role_names(&content);
    debug!("IMDS listed roles: {role_names:?}");

    // An instance profile can contain only one IAM role.
    let Some(role_name) = role_names.first() else {
        return Err(Error::config_invalid("no IAM roles attached to this EC2 service")
            .with_context(format!("endpoint: {endpoint}"))
            .with_context("hint: attach an IAM role to your EC2 instance"));
    };

    url.set_path(&format!("{IMDS_SECURITY_CREDENTIALS_PATH}{role_name}"));
    let content = imds_get(ctx, &url, token.as_deref(), "fetch_credentials")
        .await
        .map_err(|e| e.with_context(format!("role: {role_name}")))?;

    let resp = RawFetchResponse::from_json(&content)
        .map_err(|e| e.with_context(format!("role: {role_name}")))?;

    match resp.code.as_str() {
        IMDS_CODE_SUCCESS => Ok(resp),
        "AssumeRoleUnauthorizedAccess" => Err(Error::permission_denied(resp.message)),
        _ => Err(Error::credential_invalid(resp.message)),
    }
}

async fn imds_get(ctx: &Context, url: &Url, token: Option<&str>, operation: &str) -> Result<String> {
    let mut req = http::Request::builder()
        .uri(url.as_str())
        .method(Method::GET);
    if let Some(token) = token {
        req = req.header(X_AWS_EC2_METADATA_TOKEN, token);
    }
    let req = req.body(Bytes::new()).map_err(|e| {
        Error::request_invalid("failed to build IMDS request")
            .with_source(e)
            .with_context(format!("operation: {operation}"))
    })?;

    let resp = ctx.http_send_as_string(req).await.map_err(|e| {
        e.with_context(format!("operation: {operation}"))
            .with_context(format!("url: {url}"))
    })?;

    if resp.status() != StatusCode::OK {
        return Err(status_error(resp.status())
            .with_context(format!("operation: {operation}"))
            .with_context(format!("url: {url}")));
    }

    Ok(resp.into_body())
}
