//! Entity kinds and user-selectable modes.
//!
//! All enums serialize as lowercase strings so they can be written into
//! config files and local metadata unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Kind of remote entity a local unit was synced from.
///
/// `Colors` and `TextStyles` name the per-project palette units whose
/// children are individual colors and text styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Project,
    Component,
    Screen,
    Colors,
    Color,
    TextStyles,
    TextStyle,
}

impl EntityKind {
    /// Tag stored in the `remote-type` metadata field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Component => "component",
            Self::Screen => "screen",
            Self::Colors => "colors",
            Self::Color => "color",
            Self::TextStyles => "text-styles",
            Self::TextStyle => "text-style",
        }
    }

    /// Human label used as the type line in rendered content.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Component => "Component",
            Self::Screen => "Screen",
            Self::Colors => "Colors",
            Self::Color => "Color",
            Self::TextStyles => "Text Styles",
            Self::TextStyle => "Text Style",
        }
    }

    /// Folder/namespace segment grouping entities of this kind.
    #[must_use]
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Project => "Projects",
            Self::Component => "Components",
            Self::Screen => "Screens",
            Self::Colors | Self::Color => "Colors",
            Self::TextStyles | Self::TextStyle => "Text Styles",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TemplateDetail
// ---------------------------------------------------------------------------

/// Verbosity of rendered component and screen content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateDetail {
    #[default]
    Detailed,
    Minimal,
}

impl TemplateDetail {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Minimal => "minimal",
        }
    }
}

impl fmt::Display for TemplateDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateDetail {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "minimal" => Ok(Self::Minimal),
            _ => Err(CoreError::UnknownVariant {
                kind: "template detail",
                value: s.to_string(),
                expected: "detailed, minimal",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ImageStorage
// ---------------------------------------------------------------------------

/// How preview images end up in the local store.
///
/// - `Inline`: bytes fetched and embedded as a base64 data URI
/// - `Assets`: direct link to the remote URL
/// - `Local`: bytes fetched and written into the store's asset folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStorage {
    Inline,
    #[default]
    Assets,
    Local,
}

impl ImageStorage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Assets => "assets",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for ImageStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStorage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "assets" => Ok(Self::Assets),
            "local" => Ok(Self::Local),
            _ => Err(CoreError::UnknownVariant {
                kind: "image storage",
                value: s.to_string(),
                expected: "inline, assets, local",
            }),
        }
    }
}
