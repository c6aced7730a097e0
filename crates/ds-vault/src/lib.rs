//! # ds-vault
//!
//! Local Unit Stores for designsync. A *unit* is one page or file in the
//! user's notes; a unit may hold *children*, nested blocks that carry their
//! own remote ID.
//!
//! Two file-backed hosts share one engine ([`FileStore`]):
//!
//! - [`MarkdownVault`]: a folder tree of `.md` files with YAML frontmatter.
//! - [`OutlineGraph`]: a flat `pages/` directory of outline pages whose
//!   namespaces encode the path (`a___b___c.md`).
//!
//! [`MemoryStore`] keeps everything in memory and backs orchestrator tests.
//!
//! Every store keeps a [`RemoteIdIndex`] so remote-ID lookups never scan
//! the vault after it has been opened.

mod document;
mod error;
mod index;
mod markdown;
mod memory;
mod outline;
mod store;

pub use document::{Document, Segment};
pub use error::{FormatError, StoreError};
pub use index::RemoteIdIndex;
pub use markdown::{MarkdownFormat, MarkdownVault};
pub use memory::MemoryStore;
pub use outline::{OutlineFormat, OutlineGraph};
pub use store::{FileStore, Layout, PageFormat};

use std::collections::BTreeMap;
use std::fmt;

/// Standard metadata keys written on every synced unit.
pub mod keys {
    pub const REMOTE_ID: &str = "remote-id";
    pub const REMOTE_TYPE: &str = "remote-type";
    pub const LAST_SYNCED: &str = "last-synced";
    pub const SOURCE_URL: &str = "source-url";
}

/// Key/value metadata attached to a unit or child.
pub type Metadata = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// Hierarchical location of a unit: one entry per folder/namespace level,
/// the last entry being the unit name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitPath(Vec<String>);

impl UnitPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment, or `""` for the empty path.
    pub fn name(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Path without its last segment.
    #[must_use]
    pub fn parent(&self) -> Self {
        let mut segments = self.0.clone();
        segments.pop();
        Self(segments)
    }

    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Same parent, different last segment.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        self.parent().join(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A path every store can address: at least one segment, and no segment
    /// that is empty, a relative marker, or contains a separator.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.iter().all(|s| {
                let s = s.trim();
                !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
            })
    }

    /// `a/b/c`, the form used inside `[[wiki links]]`.
    pub fn to_link_target(&self) -> String {
        self.0.join("/")
    }
}

impl fmt::Display for UnitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_link_target())
    }
}

/// Store-specific handle of a unit. File stores use the file path relative
/// to their page directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A nested content block owned by the sync: identified inside its parent
/// by `remote_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildUnit {
    pub remote_id: String,
    pub content: String,
    /// Extra metadata besides the remote ID.
    pub metadata: Metadata,
}

impl ChildUnit {
    pub fn new(remote_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            remote_id: remote_id.into(),
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// What a host supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub pages: bool,
    /// Children are real blocks rather than delimited sections of a file.
    pub blocks: bool,
    /// Binary assets can be written next to the pages.
    pub assets: bool,
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Local Unit Store: the primitives the upsert engine needs from a host.
///
/// Every mutating call has completed (and is persisted) when it returns.
pub trait UnitStore {
    fn capabilities(&self) -> Capabilities;

    /// Make sure a folder/namespace exists.
    fn ensure_container(&mut self, path: &UnitPath) -> Result<(), StoreError>;

    /// First unit whose metadata `key` equals `value`. Lookups by
    /// [`keys::REMOTE_ID`] are answered from the index.
    fn find_by_metadata(&self, key: &str, value: &str) -> Result<Option<UnitId>, StoreError>;

    fn path_of(&self, id: &UnitId) -> Result<UnitPath, StoreError>;

    fn metadata(&self, id: &UnitId) -> Result<Metadata, StoreError>;

    /// Main content of a unit, without its children.
    fn content(&self, id: &UnitId) -> Result<String, StoreError>;

    /// Create a unit at `path`, or at a suffixed sibling name if the path is
    /// taken. Returns `None` when the store cannot address `path`.
    fn create_unit(
        &mut self,
        path: &UnitPath,
        content: &str,
        metadata: &Metadata,
    ) -> Result<Option<UnitId>, StoreError>;

    /// Replace the main content and set the given metadata keys. Keys not
    /// mentioned and all children are kept.
    fn update_unit(
        &mut self,
        id: &UnitId,
        content: &str,
        metadata: &Metadata,
    ) -> Result<(), StoreError>;

    /// Move a unit; returns its new handle.
    fn relocate_unit(&mut self, id: &UnitId, path: &UnitPath) -> Result<UnitId, StoreError>;

    /// Children that carry a remote ID, in document order.
    fn list_children(&self, id: &UnitId) -> Result<Vec<ChildUnit>, StoreError>;

    /// Append a child after the existing ones.
    fn insert_child(&mut self, id: &UnitId, child: &ChildUnit) -> Result<(), StoreError>;

    /// Replace the child with the same remote ID; `false` if there is none.
    fn update_child(&mut self, id: &UnitId, child: &ChildUnit) -> Result<bool, StoreError>;

    /// `false` if no child has this remote ID.
    fn remove_child(&mut self, id: &UnitId, remote_id: &str) -> Result<bool, StoreError>;

    /// Persist a binary asset and return the link target to embed it with.
    fn write_asset(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let path = UnitPath::new(["Zeplin", "Atlas", "Components", "Button"]);
        assert_eq!(path.name(), "Button");
        assert_eq!(path.parent().to_link_target(), "Zeplin/Atlas/Components");
        assert_eq!(
            path.with_name("Button 2").to_string(),
            "Zeplin/Atlas/Components/Button 2"
        );
        assert!(path.is_valid());
    }

    #[test]
    fn invalid_paths() {
        assert!(!UnitPath::new(Vec::<String>::new()).is_valid());
        assert!(!UnitPath::new(["a", ""]).is_valid());
        assert!(!UnitPath::new(["a", ".."]).is_valid());
        assert!(!UnitPath::new(["a/b"]).is_valid());
    }

    #[test]
    fn child_builder() {
        let child = ChildUnit::new("v1", "![v1](u)").with_metadata("remote-type", "version");
        assert_eq!(child.metadata.get("remote-type").map(String::as_str), Some("version"));
    }
}
