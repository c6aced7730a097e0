//! HTTP client for the Zeplin REST API.

use std::time::Duration;

use ds_config::ApiConfig;
use ds_core::entities::{Color, Component, Project, Screen, Section, TextStyle};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::DesignSource;
use crate::error::{ApiError, ErrorCategory};
use crate::http::check_response;
use crate::retry::{RetryConfig, retry_with_backoff};

/// Page size for collection endpoints (the API maximum).
const PAGE_SIZE: usize = 100;

/// Authenticated client for the design API.
///
/// API calls carry the bearer token; asset downloads go through a second
/// client without it so the token never reaches CDN hosts.
pub struct ZeplinClient {
    api: reqwest::Client,
    assets: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl ZeplinClient {
    /// Build a client from the `[api]` config section.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCategory::Unauthorized`] error when the token is
    /// missing or not a valid header value, and [`ErrorCategory::Other`] if
    /// the HTTP client cannot be constructed.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let token = config.token.trim();
        if token.is_empty() {
            return Err(ApiError::new(
                ErrorCategory::Unauthorized,
                "No API token configured; set api.token or DSYNC_API__TOKEN",
            ));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ApiError::new(
                ErrorCategory::Unauthorized,
                "API token contains characters not allowed in an HTTP header",
            )
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let api = reqwest::Client::builder()
            .user_agent(concat!("dsync/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        let assets = reqwest::Client::builder()
            .user_agent(concat!("dsync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            api,
            assets,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::from_api_config(config),
        })
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a JSON document, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        retry_with_backoff(&self.retry, || async {
            tracing::debug!(%url, "GET");
            let resp = check_response(self.api.get(&url).send().await?).await?;
            let bytes = resp.bytes().await?;
            Ok::<T, ApiError>(serde_json::from_slice(&bytes)?)
        })
        .await
    }

    /// GET every page of a collection endpoint.
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut offset = 0;
        loop {
            let page: Vec<T> = self
                .get_json(&format!("{path}?limit={PAGE_SIZE}&offset={offset}"))
                .await?;
            let received = page.len();
            items.extend(page);
            if received < PAGE_SIZE {
                return Ok(items);
            }
            offset += received;
        }
    }
}

fn enc(segment: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(segment)
}

impl DesignSource for ZeplinClient {
    async fn get_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_all("/projects").await
    }

    async fn get_project(&self, project_id: &str) -> Result<Project, ApiError> {
        self.get_json(&format!("/projects/{}", enc(project_id)))
            .await
    }

    async fn get_components(&self, project_id: &str) -> Result<Vec<Component>, ApiError> {
        self.get_all(&format!("/projects/{}/components", enc(project_id)))
            .await
    }

    async fn get_component(
        &self,
        project_id: &str,
        component_id: &str,
    ) -> Result<Component, ApiError> {
        self.get_json(&format!(
            "/projects/{}/components/{}",
            enc(project_id),
            enc(component_id)
        ))
        .await
    }

    async fn get_screens(&self, project_id: &str) -> Result<Vec<Screen>, ApiError> {
        self.get_all(&format!("/projects/{}/screens", enc(project_id)))
            .await
    }

    async fn get_screen(&self, project_id: &str, screen_id: &str) -> Result<Screen, ApiError> {
        self.get_json(&format!(
            "/projects/{}/screens/{}",
            enc(project_id),
            enc(screen_id)
        ))
        .await
    }

    async fn get_colors(&self, project_id: &str) -> Result<Vec<Color>, ApiError> {
        self.get_all(&format!("/projects/{}/colors", enc(project_id)))
            .await
    }

    async fn get_text_styles(&self, project_id: &str) -> Result<Vec<TextStyle>, ApiError> {
        self.get_all(&format!("/projects/{}/text_styles", enc(project_id)))
            .await
    }

    async fn get_sections(&self, project_id: &str) -> Result<Vec<Section>, ApiError> {
        let mut sections: Vec<Section> = self
            .get_all(&format!("/projects/{}/component_sections", enc(project_id)))
            .await?;
        let screen_sections: Vec<Section> = self
            .get_all(&format!("/projects/{}/screen_sections", enc(project_id)))
            .await?;
        sections.extend(screen_sections);
        Ok(sections)
    }

    async fn test_connection(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self.get_json("/users/me").await?;
        Ok(())
    }

    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, ApiError> {
        let resp = self.assets.get(url).timeout(timeout).send().await?;
        let resp = check_response(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}
