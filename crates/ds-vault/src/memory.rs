//! In-memory unit store.

use std::collections::{BTreeMap, BTreeSet};

use crate::document::Document;
use crate::error::StoreError;
use crate::index::RemoteIdIndex;
use crate::{Capabilities, ChildUnit, Metadata, UnitId, UnitPath, UnitStore, keys};

/// Units kept in a map keyed by their joined path. Has no asset support.
#[derive(Debug, Default)]
pub struct MemoryStore {
    units: BTreeMap<UnitId, (UnitPath, Document)>,
    containers: BTreeSet<UnitPath>,
    index: RemoteIdIndex,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Every unit with its path, ordered by handle.
    pub fn units(&self) -> impl Iterator<Item = (&UnitId, &UnitPath)> {
        self.units.iter().map(|(id, (path, _))| (id, path))
    }

    pub fn containers(&self) -> &BTreeSet<UnitPath> {
        &self.containers
    }

    fn doc(&self, id: &UnitId) -> Result<&Document, StoreError> {
        self.units
            .get(id)
            .map(|(_, doc)| doc)
            .ok_or_else(|| StoreError::UnknownUnit(id.clone()))
    }

    fn doc_mut(&mut self, id: &UnitId) -> Result<&mut Document, StoreError> {
        self.units
            .get_mut(id)
            .map(|(_, doc)| doc)
            .ok_or_else(|| StoreError::UnknownUnit(id.clone()))
    }

    fn free_id(&self, path: &UnitPath) -> (UnitId, UnitPath) {
        let mut candidate = path.clone();
        let mut n = 2;
        while self.units.contains_key(&UnitId::new(candidate.to_link_target())) {
            candidate = path.with_name(format!("{} {n}", path.name()));
            n += 1;
        }
        (UnitId::new(candidate.to_link_target()), candidate)
    }
}

impl UnitStore for MemoryStore {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            pages: true,
            blocks: true,
            assets: false,
        }
    }

    fn ensure_container(&mut self, path: &UnitPath) -> Result<(), StoreError> {
        if !path.is_valid() {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        self.containers.insert(path.clone());
        Ok(())
    }

    fn find_by_metadata(&self, key: &str, value: &str) -> Result<Option<UnitId>, StoreError> {
        if key == keys::REMOTE_ID {
            return Ok(self.index.get(value).cloned());
        }
        Ok(self
            .units
            .iter()
            .find(|(_, (_, doc))| doc.property(key).as_deref() == Some(value))
            .map(|(id, _)| id.clone()))
    }

    fn path_of(&self, id: &UnitId) -> Result<UnitPath, StoreError> {
        self.units
            .get(id)
            .map(|(path, _)| path.clone())
            .ok_or_else(|| StoreError::UnknownUnit(id.clone()))
    }

    fn metadata(&self, id: &UnitId) -> Result<Metadata, StoreError> {
        Ok(self.doc(id)?.metadata())
    }

    fn content(&self, id: &UnitId) -> Result<String, StoreError> {
        Ok(self.doc(id)?.body.clone())
    }

    fn create_unit(
        &mut self,
        path: &UnitPath,
        content: &str,
        metadata: &Metadata,
    ) -> Result<Option<UnitId>, StoreError> {
        if !path.is_valid() {
            return Ok(None);
        }
        let (id, path) = self.free_id(path);
        if let Some(remote_id) = metadata.get(keys::REMOTE_ID) {
            self.index.insert(remote_id.clone(), id.clone());
        }
        self.units
            .insert(id.clone(), (path, Document::new(content, metadata)));
        Ok(Some(id))
    }

    fn update_unit(
        &mut self,
        id: &UnitId,
        content: &str,
        metadata: &Metadata,
    ) -> Result<(), StoreError> {
        let doc = self.doc_mut(id)?;
        doc.body = content.trim().to_string();
        doc.merge_metadata(metadata);
        if let Some(remote_id) = metadata.get(keys::REMOTE_ID) {
            self.index.insert(remote_id.clone(), id.clone());
        }
        Ok(())
    }

    fn relocate_unit(&mut self, id: &UnitId, path: &UnitPath) -> Result<UnitId, StoreError> {
        if !path.is_valid() {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        if UnitId::new(path.to_link_target()) == *id {
            return Ok(id.clone());
        }
        let (_, doc) = self
            .units
            .remove(id)
            .ok_or_else(|| StoreError::UnknownUnit(id.clone()))?;
        let (new_id, new_path) = self.free_id(path);
        self.units.insert(new_id.clone(), (new_path, doc));
        self.index.retarget(id, &new_id);
        Ok(new_id)
    }

    fn list_children(&self, id: &UnitId) -> Result<Vec<ChildUnit>, StoreError> {
        Ok(self.doc(id)?.children())
    }

    fn insert_child(&mut self, id: &UnitId, child: &ChildUnit) -> Result<(), StoreError> {
        self.doc_mut(id)?.insert_child(child.clone());
        Ok(())
    }

    fn update_child(&mut self, id: &UnitId, child: &ChildUnit) -> Result<bool, StoreError> {
        Ok(self.doc_mut(id)?.update_child(child.clone()))
    }

    fn remove_child(&mut self, id: &UnitId, remote_id: &str) -> Result<bool, StoreError> {
        Ok(self.doc_mut(id)?.remove_child(remote_id))
    }

    fn write_asset(&mut self, _file_name: &str, _bytes: &[u8]) -> Result<String, StoreError> {
        Err(StoreError::Unsupported("assets"))
    }
}
