//! Path/namespace builder.
//!
//! Every segment is sanitized on its own, so a `/` inside a component name
//! never creates an extra folder level.

use ds_config::VaultConfig;
use ds_core::enums::EntityKind;
use ds_vault::UnitPath;

const ILLEGAL: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Name used when an entity name sanitizes to nothing.
pub const UNTITLED: &str = "Untitled";

/// Make one path segment safe for file systems and outline namespaces.
///
/// Illegal characters become `-`, whitespace runs collapse to one space, the
/// ends are trimmed and a leading `.` becomes `-` so units never turn into
/// hidden files. Applying it twice changes nothing.
#[must_use]
pub fn sanitize(segment: &str) -> String {
    let replaced: String = segment
        .chars()
        .map(|c| {
            if ILLEGAL.contains(&c) || (c.is_control() && !c.is_whitespace()) {
                '-'
            } else {
                c
            }
        })
        .collect();
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.strip_prefix('.') {
        Some(rest) => format!("-{rest}"),
        None => collapsed,
    }
}

/// Structural settings for path building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOptions {
    /// Sanitized root segments (`Design/Zeplin` becomes two levels).
    pub root: Vec<String>,
    pub project_folder: bool,
    pub group_by_section: bool,
}

impl PathOptions {
    pub fn new(root: &str, project_folder: bool, group_by_section: bool) -> Self {
        Self {
            root: root
                .split(['/', '\\'])
                .map(sanitize)
                .filter(|s| !s.is_empty())
                .collect(),
            project_folder,
            group_by_section,
        }
    }

    pub fn from_vault_config(config: &VaultConfig) -> Self {
        Self::new(&config.root, config.project_folder, config.group_by_section)
    }

    /// Root plus the project folder when enabled.
    pub fn project_base(&self, project: &str) -> UnitPath {
        let mut segments = self.root.clone();
        if self.project_folder {
            segments.push(non_empty(sanitize(project)));
        }
        UnitPath::new(segments)
    }

    /// Location of an entity, or of its type folder when `name` is `None`.
    ///
    /// `[root.., project?, type folder, section?, name?]`; the section level
    /// only appears with section grouping on and a non-blank section name.
    pub fn build(
        &self,
        project: &str,
        kind: EntityKind,
        section: Option<&str>,
        name: Option<&str>,
    ) -> UnitPath {
        let mut path = self.project_base(project).join(kind.folder());
        if self.group_by_section
            && let Some(section) = section.map(sanitize).filter(|s| !s.is_empty())
        {
            path = path.join(section);
        }
        if let Some(name) = name {
            path = path.join(non_empty(sanitize(name)));
        }
        path
    }

    /// Location of the project index unit: `[root.., project]`.
    pub fn index(&self, project: &str) -> UnitPath {
        let mut segments = self.root.clone();
        segments.push(non_empty(sanitize(project)));
        UnitPath::new(segments)
    }
}

fn non_empty(segment: String) -> String {
    if segment.is_empty() {
        UNTITLED.to_string()
    } else {
        segment
    }
}
