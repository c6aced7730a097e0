//! File-backed unit store shared by the markdown and outline hosts.
//!
//! A [`PageFormat`] decides where a unit's file lives and how its text is
//! laid out; [`FileStore`] does the rest (index, collisions, moves, assets).

use std::fs;
use std::marker::PhantomData;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;

use crate::document::Document;
use crate::error::{FormatError, StoreError};
use crate::index::RemoteIdIndex;
use crate::{Capabilities, ChildUnit, Metadata, UnitId, UnitPath, UnitStore, keys};

/// Directories a store writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Root of all unit files.
    pub pages: PathBuf,
    /// Where [`UnitStore::write_asset`] puts files.
    pub assets: PathBuf,
    /// Prepended to an asset file name to form its link target.
    pub asset_link_prefix: String,
}

/// On-disk conventions of one host.
pub trait PageFormat {
    fn capabilities() -> Capabilities;

    fn layout(root: &Path, assets_dir: &str) -> Layout;

    /// File of a unit, relative to [`Layout::pages`].
    fn file_for(path: &UnitPath) -> PathBuf;

    /// Inverse of [`Self::file_for`]; `None` for files that are not units.
    fn path_for(relative: &Path) -> Option<UnitPath>;

    /// Directory to create for a container, if the host uses directories.
    fn container_dir(layout: &Layout, path: &UnitPath) -> Option<PathBuf>;

    fn parse(text: &str) -> Result<Document, FormatError>;

    fn render(doc: &Document) -> Result<String, FormatError>;
}

pub struct FileStore<F> {
    layout: Layout,
    index: RemoteIdIndex,
    format: PhantomData<F>,
}

impl<F: PageFormat> FileStore<F> {
    /// Open (creating if needed) a store rooted at `root` and index every
    /// unit that carries a remote ID.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn open(root: impl AsRef<Path>, assets_dir: &str) -> Result<Self, StoreError> {
        let layout = F::layout(root.as_ref(), assets_dir);
        fs::create_dir_all(&layout.pages).map_err(StoreError::io(&layout.pages))?;

        let mut store = Self {
            layout,
            index: RemoteIdIndex::new(),
            format: PhantomData,
        };
        let mut entries = Vec::new();
        for id in store.unit_ids()? {
            match store.read(&id) {
                Ok(doc) => {
                    if let Some(remote_id) = doc.remote_id() {
                        entries.push((remote_id, id));
                    }
                }
                Err(error) => tracing::warn!(unit = %id, %error, "skipping unreadable unit"),
            }
        }
        store.index = RemoteIdIndex::build(entries);
        tracing::debug!(
            pages = %store.layout.pages.display(),
            indexed = store.index.len(),
            "opened vault"
        );
        Ok(store)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn index(&self) -> &RemoteIdIndex {
        &self.index
    }

    /// All unit files, sorted by path.
    pub fn unit_ids(&self) -> Result<Vec<UnitId>, StoreError> {
        let mut builder = WalkBuilder::new(&self.layout.pages);
        builder
            .standard_filters(false)
            .hidden(true)
            .sort_by_file_name(|a, b| a.cmp(b));
        let assets = self.layout.assets.clone();
        builder.filter_entry(move |entry| entry.path() != assets.as_path());

        let mut ids = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.layout.pages) else {
                continue;
            };
            if F::path_for(relative).is_some() {
                ids.push(id_from_relative(relative));
            }
        }
        Ok(ids)
    }

    /// Parse a unit file.
    pub fn read(&self, id: &UnitId) -> Result<Document, StoreError> {
        let file = self.file(id);
        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::UnknownUnit(id.clone()));
            }
            Err(e) => return Err(StoreError::io(&file)(e)),
        };
        F::parse(&text).map_err(|source| StoreError::Format { path: file, source })
    }

    fn write(&self, id: &UnitId, doc: &Document) -> Result<(), StoreError> {
        let file = self.file(id);
        let text = F::render(doc).map_err(|source| StoreError::Format {
            path: file.clone(),
            source,
        })?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(StoreError::io(parent))?;
        }
        fs::write(&file, text).map_err(StoreError::io(&file))
    }

    fn modify(
        &self,
        id: &UnitId,
        change: impl FnOnce(&mut Document) -> bool,
    ) -> Result<bool, StoreError> {
        let mut doc = self.read(id)?;
        let changed = change(&mut doc);
        if changed {
            self.write(id, &doc)?;
        }
        Ok(changed)
    }

    fn file(&self, id: &UnitId) -> PathBuf {
        self.layout.pages.join(id.as_str())
    }

    /// First free handle for `path`: the path itself, then `name 2`,
    /// `name 3` and so on.
    fn free_id(&self, path: &UnitPath) -> UnitId {
        let mut candidate = id_from_relative(&F::file_for(path));
        let mut n = 2;
        while self.file(&candidate).exists() {
            let renamed = path.with_name(format!("{} {n}", path.name()));
            candidate = id_from_relative(&F::file_for(&renamed));
            n += 1;
        }
        candidate
    }
}

fn id_from_relative(relative: &Path) -> UnitId {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    UnitId::new(parts.join("/"))
}

impl<F: PageFormat> UnitStore for FileStore<F> {
    fn capabilities(&self) -> Capabilities {
        F::capabilities()
    }

    fn ensure_container(&mut self, path: &UnitPath) -> Result<(), StoreError> {
        if !path.is_valid() {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        if let Some(dir) = F::container_dir(&self.layout, path) {
            fs::create_dir_all(&dir).map_err(StoreError::io(&dir))?;
        }
        Ok(())
    }

    fn find_by_metadata(&self, key: &str, value: &str) -> Result<Option<UnitId>, StoreError> {
        if key == keys::REMOTE_ID {
            return Ok(self.index.get(value).cloned());
        }
        for id in self.unit_ids()? {
            let doc = match self.read(&id) {
                Ok(doc) => doc,
                Err(StoreError::Format { .. } | StoreError::UnknownUnit(_)) => continue,
                Err(error) => return Err(error),
            };
            if doc.property(key).as_deref() == Some(value) {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    fn path_of(&self, id: &UnitId) -> Result<UnitPath, StoreError> {
        if !self.file(id).is_file() {
            return Err(StoreError::UnknownUnit(id.clone()));
        }
        F::path_for(Path::new(id.as_str())).ok_or_else(|| StoreError::UnknownUnit(id.clone()))
    }

    fn metadata(&self, id: &UnitId) -> Result<Metadata, StoreError> {
        Ok(self.read(id)?.metadata())
    }

    fn content(&self, id: &UnitId) -> Result<String, StoreError> {
        Ok(self.read(id)?.body)
    }

    fn create_unit(
        &mut self,
        path: &UnitPath,
        content: &str,
        metadata: &Metadata,
    ) -> Result<Option<UnitId>, StoreError> {
        if !path.is_valid() {
            tracing::warn!(%path, "refusing to create unit at invalid path");
            return Ok(None);
        }
        let id = self.free_id(path);
        self.write(&id, &Document::new(content, metadata))?;
        if let Some(remote_id) = metadata.get(keys::REMOTE_ID) {
            self.index.insert(remote_id.clone(), id.clone());
        }
        tracing::debug!(unit = %id, "created unit");
        Ok(Some(id))
    }

    fn update_unit(
        &mut self,
        id: &UnitId,
        content: &str,
        metadata: &Metadata,
    ) -> Result<(), StoreError> {
        self.modify(id, |doc| {
            doc.body = content.trim().to_string();
            doc.merge_metadata(metadata);
            true
        })?;
        if let Some(remote_id) = metadata.get(keys::REMOTE_ID) {
            self.index.insert(remote_id.clone(), id.clone());
        }
        Ok(())
    }

    fn relocate_unit(&mut self, id: &UnitId, path: &UnitPath) -> Result<UnitId, StoreError> {
        if !path.is_valid() {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        if id_from_relative(&F::file_for(path)) == *id {
            return Ok(id.clone());
        }
        let from = self.file(id);
        if !from.is_file() {
            return Err(StoreError::UnknownUnit(id.clone()));
        }
        let new_id = self.free_id(path);
        let to = self.file(&new_id);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(StoreError::io(parent))?;
        }
        fs::rename(&from, &to).map_err(StoreError::io(&from))?;
        self.index.retarget(id, &new_id);
        tracing::debug!(from = %id, to = %new_id, "moved unit");
        Ok(new_id)
    }

    fn list_children(&self, id: &UnitId) -> Result<Vec<ChildUnit>, StoreError> {
        Ok(self.read(id)?.children())
    }

    fn insert_child(&mut self, id: &UnitId, child: &ChildUnit) -> Result<(), StoreError> {
        self.modify(id, |doc| {
            doc.insert_child(child.clone());
            true
        })
        .map(|_| ())
    }

    fn update_child(&mut self, id: &UnitId, child: &ChildUnit) -> Result<bool, StoreError> {
        self.modify(id, |doc| doc.update_child(child.clone()))
    }

    fn remove_child(&mut self, id: &UnitId, remote_id: &str) -> Result<bool, StoreError> {
        self.modify(id, |doc| doc.remove_child(remote_id))
    }

    fn write_asset(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        if file_name.trim().is_empty() || file_name.contains(['/', '\\']) || file_name == ".." {
            return Err(StoreError::InvalidPath(file_name.to_string()));
        }
        fs::create_dir_all(&self.layout.assets).map_err(StoreError::io(&self.layout.assets))?;
        let file = self.layout.assets.join(file_name);
        fs::write(&file, bytes).map_err(StoreError::io(&file))?;
        tracing::debug!(asset = %file.display(), size = bytes.len(), "wrote asset");
        Ok(format!(
            "{}{}",
            self.layout.asset_link_prefix,
            file_name.replace(' ', "%20")
        ))
    }
}
