//! # repo-access-sync
//!
//! Reconciles declared team access against what GitHub reports.
//!
//! Call [`pipeline::run`] to resolve the access file against the organization
//! and walk every repository the acting team administers. The building blocks
//! are exposed for reuse and testing:
//! - [`merge`]: sorted merge of two keyed maps
//! - [`plan`]: current-access derivation and command planning
//! - [`policy`]: team-name resolution
//! - [`reconcile`]: per-repository driver

pub mod error;
pub mod merge;
pub mod pipeline;
pub mod plan;
pub mod policy;
pub mod reconcile;

pub use error::SyncError;
pub use merge::{merge_maps, MergeOutput};
pub use pipeline::{RepoReport, RunSettings, RunSummary, DEFAULT_CONCURRENCY};
pub use plan::RepoCommand;
pub use reconcile::{RepoOutcome, RunContext};
