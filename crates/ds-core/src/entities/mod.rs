//! Remote entity structs as the design API returns them.
//!
//! Field names follow the API's JSON (`snake_case`); timestamps arrive as Unix
//! seconds. Everything is read-only from designsync's point of view.

mod color;
mod image;
mod project;
mod section;
mod text_style;
mod view;

pub use color::Color;
pub use image::{ImageRef, ImageSources, Thumbnails, VersionRef};
pub use project::Project;
pub use section::{Section, SectionRef};
pub use text_style::{ColorValue, TextStyle};
pub use view::{Component, Screen};

use chrono::{DateTime, Utc};

use crate::enums::EntityKind;

/// Shared read access over components and screens.
///
/// The renderer and the image resolver work against this trait so both
/// entity kinds flow through one code path.
pub trait DesignEntity {
    fn kind(&self) -> EntityKind;
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn section_id(&self) -> Option<&str>;

    /// Tags attached to the entity. Only screens carry tags.
    fn tags(&self) -> &[String] {
        &[]
    }

    /// Last update time, falling back to creation time.
    fn last_modified(&self) -> Option<DateTime<Utc>>;

    /// Every image candidate the entity exposes, in priority order groups.
    fn image_sources(&self) -> ImageSources<'_>;
}
