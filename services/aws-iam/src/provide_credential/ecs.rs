use crate::provide_credential::utils::status_error;
use crate::RawFetchResponse;
use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::{Method, StatusCode};
use iamcred_core::{Context, Error, Result};
use log::debug;

/// Fetch credentials from a container credential endpoint.
///
/// A non-empty `token` is sent as the `Authorization` header as is.
pub async fn fetch_container_credentials(
    ctx: &Context,
    endpoint: &str,
    token: &str,
) -> Result<RawFetchResponse> {
    let mut req = http::Request::builder().method(Method::GET).uri(endpoint);
    if !token.is_empty() {
        req = req.header(AUTHORIZATION, token);
    }
    let req = req.body(Bytes::new()).map_err(|e| {
        Error::request_invalid("failed to build container credentials request")
            .with_source(e)
            .with_context(format!("endpoint: {endpoint}"))
    })?;

    debug!("fetching container credentials from {endpoint}");
    let resp = ctx
        .http_send_as_string(req)
        .await
        .map_err(|e| e.with_context(format!("endpoint: {endpoint}")))?;

    if resp.status() != StatusCode::OK {
        return Err(status_error(resp.status())
            .with_context("operation: fetch_container_credentials")
            .with_context(format!("endpoint: {endpoint}")));
    }

    RawFetchResponse::from_json(resp.body())
        .map_err(|e| e.with_context(format!("endpoint: {endpoint}")))
}

/// Fetch credentials from the pod identity agent.
///
/// The token is read from `token_file` on every call, so a rotated token
/// is always picked up.
pub async fn fetch_pod_identity_credentials(
    ctx: &Context,
    endpoint: &str,
    token_file: &str,
) -> Result<RawFetchResponse> {
    if token_file.is_empty() {
        return Err(Error::config_invalid("pod identity token file is not set"));
    }

    let token = ctx.file_read_as_string(token_file).await.map_err(|e| {
        Error::config_invalid("failed to read pod identity token file")
            .with_source(e)
            .with_context(format!("file: {token_file}"))
    })?;

    fetch_container_credentials(ctx, endpoint, &token).await
}
