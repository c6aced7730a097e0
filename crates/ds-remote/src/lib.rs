//! # ds-remote
//!
//! Remote Data Source for designsync: fetches projects and their child
//! collections (sections, components, screens, colors, text styles) from the
//! design API.
//!
//! [`DesignSource`] is the seam the sync orchestrator depends on;
//! [`ZeplinClient`] is the HTTP implementation. Every failure is an
//! [`ApiError`] carrying an [`ErrorCategory`].

mod client;
mod error;
mod http;
pub mod retry;

pub use client::ZeplinClient;
pub use error::{ApiError, ErrorCategory};
pub use retry::{RetryConfig, retry_with_backoff};

use std::time::Duration;

use ds_core::entities::{Color, Component, Project, Screen, Section, TextStyle};

/// Read-only access to the design data of one account.
///
/// Operations are awaited one at a time by the orchestrator; implementations
/// need not be safe for concurrent use.
#[allow(async_fn_in_trait)]
pub trait DesignSource {
    async fn get_projects(&self) -> Result<Vec<Project>, ApiError>;

    async fn get_project(&self, project_id: &str) -> Result<Project, ApiError>;

    async fn get_components(&self, project_id: &str) -> Result<Vec<Component>, ApiError>;

    async fn get_component(
        &self,
        project_id: &str,
        component_id: &str,
    ) -> Result<Component, ApiError>;

    async fn get_screens(&self, project_id: &str) -> Result<Vec<Screen>, ApiError>;

    async fn get_screen(&self, project_id: &str, screen_id: &str) -> Result<Screen, ApiError>;

    async fn get_colors(&self, project_id: &str) -> Result<Vec<Color>, ApiError>;

    async fn get_text_styles(&self, project_id: &str) -> Result<Vec<TextStyle>, ApiError>;

    /// Component and screen sections of a project, merged.
    async fn get_sections(&self, project_id: &str) -> Result<Vec<Section>, ApiError>;

    /// Verify the token against the API.
    async fn test_connection(&self) -> Result<(), ApiError>;

    /// Download an image (or any asset) by absolute URL.
    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, ApiError>;
}
