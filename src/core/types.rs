//! Common type definitions used across the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque numeric identifier for a file under analysis
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for an analysis module, used as the key when recording
/// per-module outcomes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ModuleId(pub u32);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Analysis lifecycle states for a file
///
/// `Created` covers upstream states where the file is not yet eligible for
/// analysis. The pipeline only ever moves a file forward from
/// `ReadyForAnalysis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileStatus {
    Created,
    ReadyForAnalysis,
    AnalysisInProgress,
    AnalysisSkipped,
    AnalysisComplete,
    AnalysisFailed,
}

impl FileStatus {
    /// Whether this status is a terminal analysis disposition
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FileStatus::AnalysisSkipped | FileStatus::AnalysisComplete | FileStatus::AnalysisFailed
        )
    }

    /// Stable display name for logs and exports
    pub fn display_name(&self) -> &str {
        match self {
            FileStatus::Created => "created",
            FileStatus::ReadyForAnalysis => "ready-for-analysis",
            FileStatus::AnalysisInProgress => "analysis-in-progress",
            FileStatus::AnalysisSkipped => "analysis-skipped",
            FileStatus::AnalysisComplete => "analysis-complete",
            FileStatus::AnalysisFailed => "analysis-failed",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Provenance of a file's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileOrigin {
    /// Extracted directly from a file system
    FileSystem,
    /// Carved out of unallocated space by an external tool
    Carved,
    /// Produced by another tool from some parent file
    Derived,
    /// Unallocated content tracked as a file
    Unallocated,
}

impl FileOrigin {
    /// Carved and derived content is produced by external tools; the pipeline
    /// never deletes a staged copy it does not own.
    pub fn is_externally_owned(&self) -> bool {
        matches!(self, FileOrigin::Carved | FileOrigin::Derived)
    }
}

/// Result of one module invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleOutcome {
    /// Module completed normally
    Ok,
    /// Module reported an analysis failure; later modules still run
    Fail,
    /// Module requested early termination of the pipeline for this file
    Stop,
}

/// One persisted (file, module, outcome) tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOutcomeRecord {
    pub file_id: FileId,
    pub module_id: ModuleId,
    pub outcome: ModuleOutcome,
}

/// A file under analysis: identity, provenance, status, and the state of its
/// materialized on-disk copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    id: FileId,
    name: String,
    origin: FileOrigin,
    size: u64,
    status: FileStatus,
    exists: bool,
    local_path: Option<PathBuf>,
}

impl FileHandle {
    /// Create a handle for a newly registered file
    pub fn new(id: FileId, name: impl Into<String>, origin: FileOrigin) -> Self {
        Self {
            id,
            name: name.into(),
            origin,
            size: 0,
            status: FileStatus::Created,
            exists: false,
            local_path: None,
        }
    }

    /// Set the content size in bytes
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Set the current analysis status
    pub fn with_status(mut self, status: FileStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark the handle as already materialized at `path`
    pub fn with_materialized(mut self, path: impl Into<PathBuf>) -> Self {
        self.exists = true;
        self.local_path = Some(path.into());
        self
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> FileOrigin {
        self.origin
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    /// Update the analysis status. Modules may use this to set a
    /// module-specific terminal disposition; the runner persists whatever
    /// status the handle carries at commit time.
    pub fn set_status(&mut self, status: FileStatus) {
        self.status = status;
    }

    /// Whether a materialized on-disk copy currently exists
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Location of the materialized copy while `exists` is true
    pub fn local_path(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }

    /// Record that the content now exists on disk at `path`
    pub fn set_materialized(&mut self, path: impl Into<PathBuf>) {
        self.exists = true;
        self.local_path = Some(path.into());
    }

    /// Record that the on-disk copy is gone
    pub fn clear_materialized(&mut self) {
        self.exists = false;
        self.local_path = None;
    }

    /// File name extension, if any
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

/// Non-error disposition of one pipeline pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The module list is empty; nothing was checked or mutated
    NoModules,
    /// The exclusion policy matched; the file was marked skipped
    Excluded,
    /// The file was not `ReadyForAnalysis`; nothing was mutated
    NotEligible(FileStatus),
    /// The module loop ran
    Analyzed {
        /// Modules actually invoked (a `Stop` truncates the loop)
        modules_run: usize,
        /// Modules that reported `Fail`
        failures: usize,
        /// Whether a module stopped the loop early
        stopped_early: bool,
    },
}
