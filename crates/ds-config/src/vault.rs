//! Local vault settings: where units are written and how they are laid out.

use serde::{Deserialize, Serialize};

/// Host storage flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultBackend {
    /// File tree: one markdown file per unit, folders per path segment.
    #[default]
    Markdown,
    /// Block tree: one outline page per unit, namespaces per path segment.
    Outline,
}

fn default_root() -> String {
    String::from("Zeplin")
}

fn default_assets_dir() -> String {
    String::from("assets")
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VaultConfig {
    /// Vault root directory on disk.
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub backend: VaultBackend,

    /// Root folder/namespace all synced units live under. May contain `/`.
    #[serde(default = "default_root")]
    pub root: String,

    /// Nest everything under a per-project folder.
    #[serde(default = "default_true")]
    pub project_folder: bool,

    /// Insert the section name between the type folder and the unit.
    #[serde(default)]
    pub group_by_section: bool,

    /// Folder (relative to the vault) for downloaded images.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            backend: VaultBackend::default(),
            root: default_root(),
            project_folder: true,
            group_by_section: false,
            assets_dir: default_assets_dir(),
        }
    }
}

impl VaultConfig {
    pub fn is_configured(&self) -> bool {
        !self.path.trim().is_empty()
    }
}
