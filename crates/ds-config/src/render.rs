//! Content rendering settings.

use ds_core::enums::{ImageStorage, TemplateDetail};
use serde::{Deserialize, Serialize};

const fn default_image_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub template: TemplateDetail,

    #[serde(default)]
    pub image_storage: ImageStorage,

    /// Timeout for downloading a preview image (inline and local storage).
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template: TemplateDetail::default(),
            image_storage: ImageStorage::default(),
            image_timeout_secs: default_image_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = RenderConfig::default();
        assert_eq!(config.template, TemplateDetail::Detailed);
        assert_eq!(config.image_storage, ImageStorage::Assets);
        assert_eq!(config.image_timeout_secs, 30);
    }
}
