//! Glob-style exclusion of entities by name.

use regex::Regex;

use crate::error::SyncError;

/// Translate a glob (`*` any run, `?` one character, line breaks included)
/// into an anchored, case-insensitive regex. Every other character matches
/// literally.
#[must_use]
pub fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::from("(?is)^");
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            _ => regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    regex.push('$');
    regex
}

/// Compiled exclude patterns. A name is excluded when any pattern matches
/// all of it.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    patterns: Vec<(String, Regex)>,
}

impl ExcludeFilter {
    /// Build from newline-separated text; lines are trimmed and blank lines
    /// skipped.
    pub fn from_text(text: &str) -> Result<Self, SyncError> {
        Self::from_patterns(text.lines())
    }

    pub fn from_patterns<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<Self, SyncError> {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            let regex = Regex::new(&glob_to_regex(pattern)).map_err(|source| SyncError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            compiled.push((pattern.to_string(), regex));
        }
        Ok(Self { patterns: compiled })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.matching_pattern(name).is_some()
    }

    /// First pattern that excludes `name`.
    pub fn matching_pattern(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(name))
            .map(|(pattern, _)| pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
