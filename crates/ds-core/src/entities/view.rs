use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DesignEntity, ImageRef, ImageSources, SectionRef, VersionRef};
use crate::enums::EntityKind;

/// A reusable component from the project's styleguide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub section: Option<SectionRef>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub latest_version: Option<VersionRef>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub updated: Option<DateTime<Utc>>,
}

/// A full screen design.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Screen {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub section: Option<SectionRef>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub latest_version: Option<VersionRef>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub updated: Option<DateTime<Utc>>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl DesignEntity for Component {
    fn kind(&self) -> EntityKind {
        EntityKind::Component
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        non_empty(self.description.as_ref())
    }

    fn section_id(&self) -> Option<&str> {
        self.section.as_ref().map(|s| s.id.as_str())
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated.or(self.created)
    }

    fn image_sources(&self) -> ImageSources<'_> {
        ImageSources {
            primary: self.image.as_ref(),
            latest: self.latest_version.as_ref().and_then(|v| v.image.as_ref()),
            history: &self.images,
        }
    }
}

impl DesignEntity for Screen {
    fn kind(&self) -> EntityKind {
        EntityKind::Screen
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        non_empty(self.description.as_ref())
    }

    fn section_id(&self) -> Option<&str> {
        self.section.as_ref().map(|s| s.id.as_str())
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated.or(self.created)
    }

    fn image_sources(&self) -> ImageSources<'_> {
        ImageSources {
            primary: self.image.as_ref(),
            latest: self.latest_version.as_ref().and_then(|v| v.image.as_ref()),
            history: &self.images,
        }
    }
}
