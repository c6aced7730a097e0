//! Remote error types.
//!
//! Every failure carries a closed [`ErrorCategory`] so callers branch on the
//! category instead of parsing message text.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Coarse failure class derived from the HTTP status or transport outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 401: token missing, expired or revoked.
    Unauthorized,
    /// 403: token valid but lacks access to the resource.
    Forbidden,
    /// 404: project or item does not exist (or is not visible).
    NotFound,
    /// 429: too many requests.
    RateLimited,
    /// Connection refused, DNS failure or timeout.
    Unreachable,
    /// Any other status, or an unreadable response body.
    Other,
}

impl ErrorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::Unreachable => "unreachable",
            Self::Other => "other",
        }
    }

    /// Map an HTTP status code to a category.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            _ => Self::Other,
        }
    }

    /// Whether a request failing this way may succeed when repeated.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::RateLimited | Self::Unreachable)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to the design API.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    category: ErrorCategory,
    message: String,
    status: Option<u16>,
    retry_after: Option<Duration>,
    #[source]
    source: Option<reqwest::Error>,
}

impl ApiError {
    #[must_use]
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            status: None,
            retry_after: None,
            source: None,
        }
    }

    /// Build an error from a non-success HTTP status and the server's message.
    #[must_use]
    pub fn from_status(status: u16, detail: &str) -> Self {
        let category = ErrorCategory::from_status(status);
        let lead = match category {
            ErrorCategory::Unauthorized => "API token was rejected; check api.token",
            ErrorCategory::Forbidden => "Access denied for this token",
            ErrorCategory::NotFound => "Resource not found",
            ErrorCategory::RateLimited => "Rate limited by the design API",
            ErrorCategory::Unreachable | ErrorCategory::Other => "Design API request failed",
        };
        let detail = detail.trim();
        let message = if detail.is_empty() {
            format!("{lead} (HTTP {status})")
        } else {
            format!("{lead} (HTTP {status}): {detail}")
        };
        Self {
            status: Some(status),
            ..Self::new(category, message)
        }
    }

    /// A 429 response, optionally carrying the server's `Retry-After` hint.
    #[must_use]
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        let mut error = Self::from_status(429, "");
        error.retry_after = retry_after;
        error
    }

    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        let (category, message) = if error.is_timeout() {
            (ErrorCategory::Unreachable, format!("Design API timed out: {error}"))
        } else if error.is_connect() {
            (
                ErrorCategory::Unreachable,
                format!("Design API unreachable: {error}"),
            )
        } else if error.is_decode() {
            (
                ErrorCategory::Other,
                format!("Unexpected response from design API: {error}"),
            )
        } else if let Some(status) = error.status() {
            return Self::from_status(status.as_u16(), &error.to_string());
        } else {
            (ErrorCategory::Other, format!("HTTP error: {error}"))
        };
        Self {
            source: Some(error),
            ..Self::new(category, message)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(
            ErrorCategory::Other,
            format!("Unexpected response from design API: {error}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_categories() {
        assert_eq!(ErrorCategory::from_status(401), ErrorCategory::Unauthorized);
        assert_eq!(ErrorCategory::from_status(403), ErrorCategory::Forbidden);
        assert_eq!(ErrorCategory::from_status(404), ErrorCategory::NotFound);
        assert_eq!(ErrorCategory::from_status(429), ErrorCategory::RateLimited);
        assert_eq!(ErrorCategory::from_status(500), ErrorCategory::Other);
        assert_eq!(ErrorCategory::from_status(400), ErrorCategory::Other);
    }

    #[test]
    fn only_rate_limit_and_transport_are_transient() {
        assert!(ErrorCategory::RateLimited.is_transient());
        assert!(ErrorCategory::Unreachable.is_transient());
        assert!(!ErrorCategory::Unauthorized.is_transient());
        assert!(!ErrorCategory::NotFound.is_transient());
        assert!(!ErrorCategory::Other.is_transient());
    }

    #[test]
    fn status_error_keeps_detail() {
        let err = ApiError::from_status(404, "Project not found");
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "Resource not found (HTTP 404): Project not found"
        );
    }

    #[test]
    fn rate_limited_carries_hint() {
        let err = ApiError::rate_limited(Some(Duration::from_secs(7)));
        assert_eq!(err.category(), ErrorCategory::RateLimited);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
    }
}
