//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (429 with `Retry-After` parsing, other
//! non-success statuses mapped to an [`ErrorCategory`](crate::ErrorCategory))
//! so the client methods stay focused on paths and payloads.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ApiError;

/// Error body shape returned by the design API.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
}

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. A 429 becomes a rate-limit
/// error carrying the parsed `Retry-After` delay; any other non-success
/// status becomes an [`ApiError`] whose message includes the server's
/// explanation when the body has one.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.as_u16() == 429 {
        return Err(ApiError::rate_limited(parse_retry_after(&resp)));
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status.as_u16(), &error_detail(&body)));
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as whole seconds.
fn parse_retry_after(resp: &reqwest::Response) -> Option<Duration> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Pull a readable message out of an error body, JSON or plain text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            detail,
        }) => match detail {
            Some(detail) if !detail.is_empty() => format!("{message} ({detail})"),
            _ => message,
        },
        _ => body.chars().take(200).collect(),
    }
}
