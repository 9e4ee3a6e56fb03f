use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use crate::{ApiError, FailureKind};

pub(crate) fn build_client(
    connect_timeout: Duration,
    request_timeout: Duration,
    headers: HeaderMap,
) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .user_agent(format!("grocery/{}", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .build()
        .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))
}

/// Header value for a secret; hidden from `Debug` output.
pub(crate) fn secret_header(value: String) -> Result<HeaderValue, ApiError> {
    let mut header = HeaderValue::from_str(&value)
        .map_err(|err| ApiError::new(FailureKind::InvalidRequest, err.to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}

pub(crate) fn parse_base_url(raw: &str) -> Result<reqwest::Url, ApiError> {
    let url = reqwest::Url::parse(raw)
        .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::new(FailureKind::InvalidUrl, "url cannot be a base"));
    }
    Ok(url)
}

/// Appends path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &reqwest::Url, segments: &[&str]) -> Result<reqwest::Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "url cannot be a base"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Rejects non-2xx responses, keeping the response body as the message.
pub(crate) async fn success_or_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        status.to_string()
    } else {
        body
    };
    Err(ApiError::new(FailureKind::HttpStatus(status.as_u16()), message))
}

pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    success_or_status(response)
        .await?
        .json::<Value>()
        .await
        .map_err(map_reqwest_error)
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
