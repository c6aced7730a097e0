//! # ds-core
//!
//! Core types shared across all designsync crates:
//! - Remote entity structs (projects, sections, components, screens, colors,
//!   text styles) as the design API returns them
//! - Entity kind, template detail and image storage enums
//! - Pure color and typography formatting

pub mod color;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod typography;

pub use color::rgba_to_hex;
pub use typography::format_text_style;
