//! Reqwest-based HTTP sending for iamcred.
//!
//! ```no_run
//! use iamcred_core::Context;
//! use iamcred_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), reqwest::Error> {
//! let client = reqwest::Client::builder()
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use iamcred_core::{Error, HttpSend, Result};
use reqwest::{Client, Request};

/// ReqwestHttpSend sends requests with a [`reqwest::Client`].
///
/// Client timeouts surface as [`ErrorKind::Timeout`](iamcred_core::ErrorKind::Timeout).
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> Error {
    let err = if e.is_timeout() {
        Error::timeout("http request timed out")
    } else if e.is_builder() {
        Error::request_invalid("failed to build http request")
    } else {
        Error::unexpected("failed to send http request").set_retryable(e.is_connect())
    };

    match e.url() {
        Some(url) => err.with_context(format!("url: {url}")).with_source(e),
        None => err.with_source(e),
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req).map_err(map_reqwest_error)?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(map_reqwest_error)?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(map_reqwest_error)?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iamcred_core::{Context, ErrorKind};

    #[tokio::test]
    async fn test_invalid_request_is_reported() {
        let ctx = Context::new().with_http_send(ReqwestHttpSend::default());

        let req = http::Request::builder()
            .uri("/relative/only")
            .body(Bytes::new())
            .expect("request must be valid");
        let err = ctx.http_send(req).await.expect_err("relative uri must fail");
        assert_ne!(err.kind(), ErrorKind::Timeout);
    }
}
