//! Exclusion settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Glob patterns, one per line. Blank lines are ignored.
    #[serde(default)]
    pub exclude_patterns: String,
}

impl FilterConfig {
    /// Number of non-blank pattern lines.
    pub fn pattern_count(&self) -> usize {
        self.exclude_patterns
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count()
    }
}
