//! # ds-sync
//!
//! Sync orchestration for designsync: one project from a [`DesignSource`]
//! into a [`UnitStore`].
//!
//! Pieces, leaves first:
//! - [`paths`]: deterministic, sanitized unit paths
//! - [`exclude`]: anchored case-insensitive glob exclusion by name
//! - [`image`]: preview URL resolution and inline/asset/local materialization
//! - [`render`]: unit content in detailed or minimal form
//! - [`upsert`]: create-or-update keyed by remote ID, with child reconciliation
//! - [`SyncOrchestrator`]: the sequential fetch → filter → render → upsert run
//!
//! [`DesignSource`]: ds_remote::DesignSource
//! [`UnitStore`]: ds_vault::UnitStore

pub mod error;
pub mod exclude;
pub mod image;
mod orchestrator;
pub mod paths;
pub mod render;
mod report;
pub mod upsert;

pub use error::SyncError;
pub use exclude::ExcludeFilter;
pub use orchestrator::{SyncOptions, SyncOrchestrator, SyncProgress};
pub use paths::{PathOptions, sanitize};
pub use report::{KindCounts, SyncReport};
pub use upsert::{ChildChanges, UpsertAction, UpsertOutcome, upsert};
