//! Cross-cutting error types for designsync.
//!
//! Domain-specific errors (`ApiError`, `StoreError`, `SyncError`) live in
//! their own crates; this one covers parsing of shared enums.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not name any variant of the expected enum.
    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}
