//! Store error types for ds-vault.

use std::path::PathBuf;

use crate::UnitId;

/// A page file could not be parsed or rendered.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Malformed(String),
}

/// Errors from local unit stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("vault walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("unknown unit: {0}")]
    UnknownUnit(UnitId),

    #[error("invalid unit path: {0:?}")]
    InvalidPath(String),

    #[error("store does not support {0}")]
    Unsupported(&'static str),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
