use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Thumbnail URLs rendered by the design API at fixed sizes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thumbnails {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

/// One preview image. Any of the URL fields may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRef {
    /// Present on history entries; identifies the version the image belongs to.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
}

impl ImageRef {
    #[must_use]
    pub fn large_thumbnail(&self) -> Option<&str> {
        self.thumbnails.as_ref().and_then(|t| t.large.as_deref())
    }

    #[must_use]
    pub fn medium_thumbnail(&self) -> Option<&str> {
        self.thumbnails.as_ref().and_then(|t| t.medium.as_deref())
    }
}

/// Latest version summary embedded in item payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
}

/// Borrowed view over every image an entity exposes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSources<'a> {
    pub primary: Option<&'a ImageRef>,
    pub latest: Option<&'a ImageRef>,
    pub history: &'a [ImageRef],
}
