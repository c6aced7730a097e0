//! Design API connection settings.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    String::from("https://api.zeplin.dev/v1")
}

fn default_app_url() -> String {
    String::from("https://app.zeplin.io")
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    500
}

const fn default_max_delay_ms() -> u64 {
    8_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Personal access token sent as a bearer token.
    #[serde(default)]
    pub token: String,

    /// REST API root, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Web app root used for deep links back to the source.
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts for a request that fails transiently (rate limit, transport).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry; doubles per attempt.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Cap on the delay between retries.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: default_base_url(),
            app_url: default_app_url(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl ApiConfig {
    /// Check if a token is present.
    pub fn is_configured(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Token with everything but the last four characters masked.
    pub fn masked_token(&self) -> String {
        let token = self.token.trim();
        if token.is_empty() {
            return String::new();
        }
        let visible: String = token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{visible}")
    }
}
