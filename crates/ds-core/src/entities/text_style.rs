use serde::{Deserialize, Serialize};

use crate::color::rgba_to_hex;

/// Color value attached to a text style (no ID of its own).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColorValue {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

const fn opaque() -> f64 {
    1.0
}

const fn regular_weight() -> f64 {
    400.0
}

impl ColorValue {
    #[must_use]
    pub fn hex(&self) -> String {
        rgba_to_hex(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextStyle {
    pub id: String,
    pub name: String,
    pub font_family: String,
    pub font_size: f64,
    #[serde(default = "regular_weight")]
    pub font_weight: f64,
    #[serde(default)]
    pub line_height: Option<f64>,
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub color: Option<ColorValue>,
}
