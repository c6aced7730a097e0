//! Sync error types for ds-sync.

use ds_remote::ApiError;
use ds_vault::StoreError;

/// Errors that abort a sync run. There is no per-item isolation: the first
/// error stops the project sync.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A remote call failed; the category is kept on the inner error.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("local store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid exclude pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
