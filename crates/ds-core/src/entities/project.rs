use serde::{Deserialize, Serialize};

/// Root of a sync run. One project is synced per invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub number_of_screens: u32,
    #[serde(default)]
    pub number_of_components: u32,
    #[serde(default)]
    pub number_of_colors: u32,
    #[serde(default)]
    pub number_of_text_styles: u32,
}
