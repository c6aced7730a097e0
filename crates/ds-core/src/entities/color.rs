use serde::{Deserialize, Serialize};

use crate::color::rgba_to_hex;

/// A project color. Channels are normalized floats in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

const fn opaque() -> f64 {
    1.0
}

impl Color {
    #[must_use]
    pub fn hex(&self) -> String {
        rgba_to_hex(self.r, self.g, self.b, self.a)
    }

    /// Name for display and exclusion matching; unnamed colors use their hex.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.hex(),
        }
    }
}
