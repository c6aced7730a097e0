//! Idempotent create-or-update keyed by remote ID.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};
use ds_vault::{ChildUnit, Metadata, StoreError, UnitId, UnitPath, UnitStore, keys};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertAction {
    Created,
    Updated,
}

/// How a unit's synced children changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChildChanges {
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub id: UnitId,
    pub action: UpsertAction,
    pub children: ChildChanges,
}

/// One unit to create or update.
#[derive(Debug, Clone)]
pub struct Upsert<'a> {
    pub parent: &'a UnitPath,
    pub name: &'a str,
    pub content: &'a str,
    pub remote_id: &'a str,
    /// Extra metadata (`remote-type`, `source-url`, ...). `remote-id` and
    /// `last-synced` are added.
    pub metadata: Metadata,
    pub children: &'a [ChildUnit],
}

/// Create the unit, or update the one already carrying `remote_id`.
///
/// On update the content is replaced, metadata merged (user keys survive),
/// the unit is moved when its derived path changed and children are
/// reconciled by remote ID. Returns `None` when the store cannot create the
/// unit at the requested location.
///
/// # Errors
///
/// Only genuine store failures are errors; "not found" is the create path.
pub fn upsert<S: UnitStore + ?Sized>(
    store: &mut S,
    request: &Upsert<'_>,
    synced_at: DateTime<Utc>,
) -> Result<Option<UpsertOutcome>, StoreError> {
    let mut metadata = request.metadata.clone();
    metadata.insert(keys::REMOTE_ID.into(), request.remote_id.into());
    metadata.insert(
        keys::LAST_SYNCED.into(),
        synced_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    let path = request.parent.join(request.name);

    let Some(existing) = store.find_by_metadata(keys::REMOTE_ID, request.remote_id)? else {
        let Some(id) = store.create_unit(&path, request.content, &metadata)? else {
            tracing::warn!(%path, remote_id = request.remote_id, "store refused unit location");
            return Ok(None);
        };
        let children = distinct(request.children);
        for child in &children {
            store.insert_child(&id, child)?;
        }
        return Ok(Some(UpsertOutcome {
            id,
            action: UpsertAction::Created,
            children: ChildChanges {
                inserted: children.len(),
                ..ChildChanges::default()
            },
        }));
    };

    let current = store.path_of(&existing)?;
    let id = if is_at(&current, &path) {
        existing
    } else {
        tracing::debug!(from = %current, to = %path, "moving unit");
        store.relocate_unit(&existing, &path)?
    };

    let mut merged = store.metadata(&id)?;
    merged.extend(metadata);
    store.update_unit(&id, request.content, &merged)?;
    let children = reconcile_children(store, &id, request.children)?;

    Ok(Some(UpsertOutcome {
        id,
        action: UpsertAction::Updated,
        children,
    }))
}

/// `current` is `wanted`, or a collision-suffixed sibling of it
/// (`Button 2` for `Button`).
fn is_at(current: &UnitPath, wanted: &UnitPath) -> bool {
    if current == wanted {
        return true;
    }
    if current.parent() != wanted.parent() {
        return false;
    }
    current
        .name()
        .strip_prefix(wanted.name())
        .and_then(|rest| rest.strip_prefix(' '))
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// First copy of each remote ID, in order.
fn distinct(children: &[ChildUnit]) -> Vec<&ChildUnit> {
    let mut seen = HashSet::new();
    children
        .iter()
        .filter(|child| seen.insert(child.remote_id.as_str()))
        .collect()
}

/// Make the unit's synced children match `wanted`: stale ones removed,
/// changed ones updated, new ones appended. Children the store does not
/// report (no remote ID) are never touched.
///
/// A remote ID present more than once in the unit is removed entirely and
/// written back as a single child.
pub fn reconcile_children<S: UnitStore + ?Sized>(
    store: &mut S,
    id: &UnitId,
    wanted: &[ChildUnit],
) -> Result<ChildChanges, StoreError> {
    let wanted = distinct(wanted);
    let wanted_ids: HashSet<&str> = wanted.iter().map(|c| c.remote_id.as_str()).collect();
    let existing = store.list_children(id)?;
    let mut copies: HashMap<&str, usize> = HashMap::new();
    for child in &existing {
        *copies.entry(child.remote_id.as_str()).or_default() += 1;
    }
    let mut changes = ChildChanges::default();

    // First copy of each collapsed duplicate, to judge the rewrite against.
    let mut collapsed: HashMap<&str, &ChildUnit> = HashMap::new();
    for child in &existing {
        let remote_id = child.remote_id.as_str();
        let Some(count) = copies.remove(remote_id) else {
            continue;
        };
        let stale = !wanted_ids.contains(remote_id);
        if !stale && count < 2 {
            continue;
        }
        if !store.remove_child(id, remote_id)? {
            continue;
        }
        if stale {
            changes.removed += count;
        } else {
            changes.removed += count - 1;
            collapsed.insert(remote_id, child);
        }
    }

    let remaining = store.list_children(id)?;
    for child in wanted {
        match remaining.iter().find(|c| c.remote_id == child.remote_id) {
            Some(current) if current == child => changes.unchanged += 1,
            Some(_) => {
                store.update_child(id, child)?;
                changes.updated += 1;
            }
            None => {
                store.insert_child(id, child)?;
                match collapsed.get(child.remote_id.as_str()) {
                    Some(first) if *first == child => changes.unchanged += 1,
                    Some(_) => changes.updated += 1,
                    None => changes.inserted += 1,
                }
            }
        }
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ds_vault::MemoryStore;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap()
    }

    fn parent() -> UnitPath {
        UnitPath::new(["Zeplin", "Atlas", "Components"])
    }

    fn request<'a>(parent: &'a UnitPath, content: &'a str, children: &'a [ChildUnit]) -> Upsert<'a> {
        Upsert {
            parent,
            name: "Button",
            content,
            remote_id: "c1",
            metadata: Metadata::from([(keys::REMOTE_TYPE.into(), "component".into())]),
            children,
        }
    }

    #[test]
    fn second_upsert_updates_the_same_unit() {
        let mut store = MemoryStore::new();
        let parent = parent();

        let first = upsert(&mut store, &request(&parent, "A", &[]), at())
            .unwrap()
            .unwrap();
        let second = upsert(&mut store, &request(&parent, "B", &[]), at())
            .unwrap()
            .unwrap();

        assert_eq!(first.action, UpsertAction::Created);
        assert_eq!(second.action, UpsertAction::Updated);
        assert_eq!(first.id, second.id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.content(&second.id).unwrap(), "B");
        let metadata = store.metadata(&second.id).unwrap();
        assert_eq!(metadata.get(keys::REMOTE_ID).map(String::as_str), Some("c1"));
        assert_eq!(
            metadata.get(keys::LAST_SYNCED).map(String::as_str),
            Some("2026-10-19T10:00:00Z")
        );
    }

    #[test]
    fn user_metadata_survives_update() {
        let mut store = MemoryStore::new();
        let parent = parent();
        let id = upsert(&mut store, &request(&parent, "A", &[]), at())
            .unwrap()
            .unwrap()
            .id;
        store
            .update_unit(&id, "A", &Metadata::from([("rating".into(), "5".into())]))
            .unwrap();

        upsert(&mut store, &request(&parent, "B", &[]), at()).unwrap();

        assert_eq!(
            store.metadata(&id).unwrap().get("rating").map(String::as_str),
            Some("5")
        );
    }

    #[test]
    fn changed_path_moves_the_unit() {
        let mut store = MemoryStore::new();
        let parent = parent();
        let id = upsert(&mut store, &request(&parent, "A", &[]), at())
            .unwrap()
            .unwrap()
            .id;

        let inputs = parent.join("Inputs");
        let moved = upsert(&mut store, &request(&inputs, "A", &[]), at())
            .unwrap()
            .unwrap();

        assert_ne!(moved.id, id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.path_of(&moved.id).unwrap(), inputs.join("Button"));
    }

    #[test]
    fn suffixed_unit_is_not_moved_every_run() {
        let mut store = MemoryStore::new();
        let parent = parent();
        store
            .create_unit(&parent.join("Button"), "mine", &Metadata::new())
            .unwrap();

        let first = upsert(&mut store, &request(&parent, "A", &[]), at())
            .unwrap()
            .unwrap();
        let second = upsert(&mut store, &request(&parent, "B", &[]), at())
            .unwrap()
            .unwrap();

        assert_eq!(first.id.as_str(), "Zeplin/Atlas/Components/Button 2");
        assert_eq!(second.id, first.id);
    }

    #[test]
    fn children_are_reconciled_not_appended() {
        let mut store = MemoryStore::new();
        let parent = parent();
        let v1 = ChildUnit::new("v1", "one");
        let v2 = ChildUnit::new("v2", "two");
        let v3 = ChildUnit::new("v3", "three");

        let first = [v1.clone(), v2.clone()];
        let created = upsert(&mut store, &request(&parent, "A", &first), at())
            .unwrap()
            .unwrap();
        assert_eq!(created.children.inserted, 2);

        let again = upsert(&mut store, &request(&parent, "A", &first), at())
            .unwrap()
            .unwrap();
        assert_eq!(
            again.children,
            ChildChanges {
                unchanged: 2,
                ..ChildChanges::default()
            }
        );

        let v2_changed = ChildUnit::new("v2", "two!");
        let next = [v2_changed.clone(), v3.clone()];
        let updated = upsert(&mut store, &request(&parent, "A", &next), at())
            .unwrap()
            .unwrap();

        assert_eq!(
            updated.children,
            ChildChanges {
                inserted: 1,
                updated: 1,
                removed: 1,
                unchanged: 0,
            }
        );
        assert_eq!(
            store.list_children(&updated.id).unwrap(),
            vec![v2_changed.clone(), v3.clone()]
        );

        // A pasted copy of a synced child collapses back to one.
        store.insert_child(&updated.id, &v3).unwrap();
        let collapsed = upsert(&mut store, &request(&parent, "A", &next), at())
            .unwrap()
            .unwrap();
        assert_eq!(
            collapsed.children,
            ChildChanges {
                removed: 1,
                unchanged: 2,
                ..ChildChanges::default()
            }
        );
        assert_eq!(
            store.list_children(&updated.id).unwrap(),
            vec![v2_changed.clone(), v3.clone()]
        );

        // Stable from then on.
        let again = upsert(&mut store, &request(&parent, "A", &next), at())
            .unwrap()
            .unwrap();
        assert_eq!(
            again.children,
            ChildChanges {
                unchanged: 2,
                ..ChildChanges::default()
            }
        );
        assert_eq!(store.list_children(&updated.id).unwrap(), vec![v2_changed, v3]);
    }

    #[test]
    fn duplicated_remote_ids_keep_one_child() {
        let mut store = MemoryStore::new();
        let parent = parent();
        let v1 = ChildUnit::new("v1", "one");
        let id = upsert(&mut store, &request(&parent, "A", &[]), at())
            .unwrap()
            .unwrap()
            .id;
        store.insert_child(&id, &v1).unwrap();
        store.insert_child(&id, &v1).unwrap();

        let changes = reconcile_children(&mut store, &id, &[v1.clone()]).unwrap();

        assert_eq!(
            changes,
            ChildChanges {
                removed: 1,
                unchanged: 1,
                ..ChildChanges::default()
            }
        );
        assert_eq!(store.list_children(&id).unwrap(), vec![v1]);
    }

    #[test]
    fn repeated_wanted_children_are_written_once() {
        let mut store = MemoryStore::new();
        let parent = parent();
        let v1 = ChildUnit::new("v1", "one");
        let twice = [v1.clone(), ChildUnit::new("v1", "again")];

        let created = upsert(&mut store, &request(&parent, "A", &twice), at())
            .unwrap()
            .unwrap();
        assert_eq!(created.children.inserted, 1);

        let again = upsert(&mut store, &request(&parent, "A", &twice), at())
            .unwrap()
            .unwrap();
        assert_eq!(again.children.unchanged, 1);
        assert_eq!(store.list_children(&created.id).unwrap(), vec![v1]);
    }

    #[test]
    fn refused_location_is_none() {
        let mut store = MemoryStore::new();
        let parent = UnitPath::new(["Zeplin"]);
        let mut req = request(&parent, "A", &[]);
        req.name = "";
        assert_eq!(upsert(&mut store, &req, at()).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn suffix_detection() {
        let wanted = UnitPath::new(["a", "Button"]);
        assert!(is_at(&UnitPath::new(["a", "Button"]), &wanted));
        assert!(is_at(&UnitPath::new(["a", "Button 12"]), &wanted));
        assert!(!is_at(&UnitPath::new(["a", "Button x"]), &wanted));
        assert!(!is_at(&UnitPath::new(["a", "Buttons"]), &wanted));
        assert!(!is_at(&UnitPath::new(["b", "Button 2"]), &wanted));
    }
}
