//! Remote ID to unit lookup, built once when a store opens.

use std::collections::HashMap;

use crate::UnitId;

/// In-memory map from remote ID to the unit that carries it.
#[derive(Debug, Clone, Default)]
pub struct RemoteIdIndex {
    by_remote: HashMap<String, UnitId>,
}

impl RemoteIdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(remote id, unit)` pairs in scan order. When two units
    /// claim the same remote ID the first one wins.
    pub fn build(entries: impl IntoIterator<Item = (String, UnitId)>) -> Self {
        let mut index = Self::new();
        for (remote_id, unit) in entries {
            if let Some(existing) = index.by_remote.get(&remote_id) {
                tracing::warn!(
                    %remote_id,
                    kept = %existing,
                    ignored = %unit,
                    "duplicate remote id in vault"
                );
                continue;
            }
            index.by_remote.insert(remote_id, unit);
        }
        index
    }

    pub fn get(&self, remote_id: &str) -> Option<&UnitId> {
        self.by_remote.get(remote_id)
    }

    pub fn insert(&mut self, remote_id: impl Into<String>, unit: UnitId) {
        self.by_remote.insert(remote_id.into(), unit);
    }

    /// Point every entry for `from` at `to` (after a move).
    pub fn retarget(&mut self, from: &UnitId, to: &UnitId) {
        for unit in self.by_remote.values_mut() {
            if unit == from {
                *unit = to.clone();
            }
        }
    }

    pub fn remove_unit(&mut self, unit: &UnitId) {
        self.by_remote.retain(|_, u| u != unit);
    }

    pub fn len(&self) -> usize {
        self.by_remote.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_remote.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_wins() {
        let index = RemoteIdIndex::build([
            ("c1".to_string(), UnitId::new("a.md")),
            ("c1".to_string(), UnitId::new("b.md")),
            ("c2".to_string(), UnitId::new("c.md")),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("c1"), Some(&UnitId::new("a.md")));
    }

    #[test]
    fn retarget_and_remove() {
        let mut index = RemoteIdIndex::new();
        index.insert("c1", UnitId::new("a.md"));
        index.retarget(&UnitId::new("a.md"), &UnitId::new("x/a.md"));
        assert_eq!(index.get("c1"), Some(&UnitId::new("x/a.md")));
        index.remove_unit(&UnitId::new("x/a.md"));
        assert!(index.is_empty());
    }
}
