use crate::constants::DEFAULT_STS_ROLE_ENDPOINT;
use http::StatusCode;
use iamcred_core::Error;
use serde::Deserialize;

/// Get the sts endpoint.
///
/// The returning format may look like `https://sts.{region}.amazonaws.com`.
/// Regions in the China partition live under `amazonaws.com.cn`.
pub fn sts_endpoint(region: Option<&str>) -> String {
    match region {
        Some(region) if region.starts_with("cn-") => {
            format!("https://sts.{region}.amazonaws.com.cn")
        }
        Some(region) if !region.is_empty() => format!("https://sts.{region}.amazonaws.com"),
        _ => DEFAULT_STS_ROLE_ENDPOINT.to_string(),
    }
}

/// Build the error returned for a non-200 response.
///
/// The message is the raw status line, such as `404 Not Found`.
pub fn status_error(status: StatusCode) -> Error {
    Error::unexpected(status.to_string()).set_retryable(status.is_server_error())
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StsErrorResponse {
    error: StsError,
    request_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StsError {
    code: String,
    message: String,
}

/// Turn an STS error response into an [`Error`].
///
/// Falls back to the status line when the body is not an STS error document.
pub fn parse_sts_error(operation: &str, status: StatusCode, body: &str) -> Error {
    let Ok(resp) = quick_xml::de::from_str::<StsErrorResponse>(body) else {
        return status_error(status)
            .with_context(format!("operation: {operation}"))
            .with_context(format!("response_length: {}", body.len()));
    };
    if resp.error.code.is_empty() {
        return status_error(status).with_context(format!("operation: {operation}"));
    }

    let message = format!("[{}] {}", resp.error.code, resp.error.message);
    let err = match resp.error.code.as_str() {
        "AccessDenied" => Error::permission_denied(message),
        "InvalidIdentityToken" | "ExpiredTokenException" | "IDPRejectedClaim" => {
            Error::credential_invalid(message)
        }
        _ => Error::unexpected(message).set_retryable(status.is_server_error()),
    };

    let err = err
        .with_context(format!("operation: {operation}"))
        .with_context(format!("status: {status}"));
    if resp.request_id.is_empty() {
        err
    } else {
        err.with_context(format!("request_id: {}", resp.request_id))
    }
}
