//! Parsed form of one unit: properties, main content and the region after
//! it that holds synced children and any text the user added around them.

use serde_yaml::{Mapping, Value};

use crate::{ChildUnit, Metadata, keys};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Page properties in file order. Values the user wrote by hand may be
    /// any YAML value; the sync only reads and writes scalars.
    pub properties: Mapping,
    /// Main content, trimmed.
    pub body: String,
    /// Everything from the first child on.
    pub tail: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Child(ChildUnit),
    /// User text between or after children, kept verbatim (trimmed).
    Text(String),
}

/// String form of a scalar property value.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Document {
    pub fn new(body: &str, metadata: &Metadata) -> Self {
        let mut doc = Self {
            body: body.trim().to_string(),
            ..Self::default()
        };
        doc.merge_metadata(metadata);
        doc
    }

    /// Scalar properties as strings.
    pub fn metadata(&self) -> Metadata {
        self.properties
            .iter()
            .filter_map(|(k, v)| Some((k.as_str()?.to_string(), scalar_string(v)?)))
            .collect()
    }

    pub fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).and_then(scalar_string)
    }

    pub fn remote_id(&self) -> Option<String> {
        self.property(keys::REMOTE_ID)
    }

    /// Set every key in `metadata`. A value that already reads the same
    /// (e.g. the number `3` against `"3"`) is left as written.
    pub fn merge_metadata(&mut self, metadata: &Metadata) {
        for (key, value) in metadata {
            if self.property(key).as_deref() == Some(value.as_str()) {
                continue;
            }
            self.properties
                .insert(Value::String(key.clone()), Value::String(value.clone()));
        }
    }

    pub fn children(&self) -> Vec<ChildUnit> {
        self.tail
            .iter()
            .filter_map(|segment| match segment {
                Segment::Child(child) => Some(child.clone()),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Insert right after the last child, so user text that follows the
    /// children stays at the end.
    pub fn insert_child(&mut self, child: ChildUnit) {
        let position = self
            .tail
            .iter()
            .rposition(|s| matches!(s, Segment::Child(_)))
            .map_or(0, |i| i + 1);
        self.tail.insert(position, Segment::Child(child));
    }

    pub fn update_child(&mut self, child: ChildUnit) -> bool {
        for segment in &mut self.tail {
            if let Segment::Child(existing) = segment
                && existing.remote_id == child.remote_id
            {
                *existing = child;
                return true;
            }
        }
        false
    }

    pub fn remove_child(&mut self, remote_id: &str) -> bool {
        let before = self.tail.len();
        self.tail
            .retain(|s| !matches!(s, Segment::Child(c) if c.remote_id == remote_id));
        self.tail.len() != before
    }
}
