//! Outcome of one project sync.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::upsert::{ChildChanges, UpsertAction};

/// Per-kind tallies. For palettes (`colors`, `text_styles`) the counts are
/// entries inside the palette unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub excluded: usize,
    /// Units the store refused to create.
    pub skipped: usize,
}

impl KindCounts {
    pub(crate) fn record(&mut self, action: UpsertAction) {
        match action {
            UpsertAction::Created => self.created += 1,
            UpsertAction::Updated => self.updated += 1,
        }
    }

    pub(crate) fn record_children(&mut self, changes: ChildChanges) {
        self.created += changes.inserted;
        self.updated += changes.updated + changes.unchanged;
        self.removed += changes.removed;
    }

    pub fn synced(&self) -> usize {
        self.created + self.updated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub project_id: String,
    pub project_name: String,
    pub components: KindCounts,
    pub screens: KindCounts,
    pub colors: KindCounts,
    pub text_styles: KindCounts,
    /// Unit ID of the project index, `None` when the store refused it.
    pub index: Option<String>,
    pub synced_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl SyncReport {
    pub(crate) fn new(project_id: &str, project_name: &str, synced_at: DateTime<Utc>) -> Self {
        Self {
            project_id: project_id.to_string(),
            project_name: project_name.to_string(),
            components: KindCounts::default(),
            screens: KindCounts::default(),
            colors: KindCounts::default(),
            text_styles: KindCounts::default(),
            index: None,
            synced_at,
            duration_ms: 0,
        }
    }

    /// Short human summary, one line.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} components, {} screens, {} colors, {} text styles ({} excluded)",
            self.project_name,
            self.components.synced(),
            self.screens.synced(),
            self.colors.synced(),
            self.text_styles.synced(),
            self.components.excluded
                + self.screens.excluded
                + self.colors.excluded
                + self.text_styles.excluded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn child_changes_fold_into_counts() {
        let mut counts = KindCounts::default();
        counts.record_children(ChildChanges {
            inserted: 2,
            updated: 1,
            removed: 3,
            unchanged: 4,
        });
        assert_eq!(counts.created, 2);
        assert_eq!(counts.updated, 5);
        assert_eq!(counts.removed, 3);
        assert_eq!(counts.synced(), 7);
    }

    #[test]
    fn summary_line() {
        let mut report = SyncReport::new(
            "p1",
            "Atlas",
            Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap(),
        );
        report.components.record(UpsertAction::Created);
        report.components.excluded = 1;
        report.screens.record(UpsertAction::Updated);
        assert_eq!(
            report.summary(),
            "Atlas: 1 components, 1 screens, 0 colors, 0 text styles (1 excluded)"
        );
    }

    #[test]
    fn serializes_for_json_output() {
        let report = SyncReport::new(
            "p1",
            "Atlas",
            Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap(),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["project_id"], "p1");
        assert_eq!(json["components"]["created"], 0);
        assert_eq!(json["synced_at"], "2026-10-19T10:00:00Z");
    }
}
