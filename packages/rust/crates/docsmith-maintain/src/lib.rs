//! docsmith-maintain - Fixes that rewrite the documentation tree.
//!
//! Every operation takes a `dry_run` flag. A dry run plans and reports the
//! exact same [`ChangeLog`] but leaves the filesystem untouched.
//!
//! Per-file failures never abort a batch; they are recorded as
//! [`Change::Failed`] entries.

mod change;
pub mod dedup;
mod error;
pub mod header;
pub mod renumber;

pub use change::{Change, ChangeLog};
pub use dedup::{DedupOutcome, Deduplicator, DuplicateGroup, GroupReason};
pub use error::MaintainError;
pub use header::{HeaderInjector, build_header, has_standard_header};
pub use renumber::{RenamePlan, Renumberer, plan_renames};
