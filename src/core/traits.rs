//! Collaborator contracts consumed by the pipeline runner
//!
//! These traits are the seams between the runner and the surrounding system:
//! file resolution, content staging, exclusion policy, and the persistent
//! status store. All of them are injected at pipeline construction so tests
//! can substitute doubles.

use crate::core::types::{FileHandle, FileId, FileStatus, ModuleId, ModuleOutcome};
use anyhow::Result;

/// Looks up the handle for a file id prior to pipeline entry
pub trait FileResolver: Send + Sync {
    /// Resolve a file id to its handle, or `None` when the id is unknown
    fn resolve(&self, file_id: FileId) -> Result<Option<FileHandle>>;
}

/// Manages the transient on-disk copy of a file's content
pub trait ContentStore: Send + Sync {
    /// Create the on-disk copy. Implementations must set the handle's
    /// `exists` flag and `local_path` on success.
    fn materialize(&self, file: &mut FileHandle) -> Result<()>;

    /// Remove the on-disk copy. Implementations must clear the handle's
    /// `exists` flag and `local_path` on success.
    fn delete(&self, file: &mut FileHandle) -> Result<()>;
}

/// Decides whether a file is excluded from analysis entirely
pub trait ExclusionPolicy: Send + Sync {
    fn should_exclude(&self, file: &FileHandle) -> Result<bool>;
}

/// Persists file status transitions and per-module outcomes
pub trait StatusStore: Send + Sync {
    /// Record the outcome of one module invocation against one file
    fn record_module_outcome(
        &self,
        file_id: FileId,
        module_id: ModuleId,
        outcome: ModuleOutcome,
    ) -> Result<()>;

    /// Commit a file's analysis status
    fn commit_file_status(&self, file_id: FileId, status: FileStatus) -> Result<()>;
}

/// A single analysis step in the pipeline
///
/// Modules are registered once, before any run, and must keep no per-file
/// state between invocations.
pub trait AnalysisModule: Send + Sync {
    /// Stable identifier used as the key for per-module outcome records
    fn module_id(&self) -> ModuleId;

    /// Module name for logging and diagnostics
    fn name(&self) -> &str;

    /// Whether this module needs the file materialized on disk before it runs
    fn requires_materialized_file(&self) -> bool {
        false
    }

    /// Run this module against the file.
    ///
    /// `Ok(ModuleOutcome::Fail)` is an expected analysis failure and the
    /// pipeline continues; `Err` is an infrastructure fault that aborts the
    /// run. Modules may set a terminal status on the handle; the runner will
    /// not overwrite it.
    fn invoke(&self, file: &mut FileHandle) -> Result<ModuleOutcome>;
}
