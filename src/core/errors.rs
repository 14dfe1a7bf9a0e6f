//! Shared error types for the pipeline

use crate::core::types::{FileId, ModuleId};
use thiserror::Error;

/// Main error type for pipeline operations
///
/// Expected analysis dispositions (exclusion, module `Fail`, module `Stop`)
/// are not errors; they resolve into a terminal file status. This enum covers
/// caller precondition violations and infrastructure faults only.
#[derive(Debug, Error)]
pub enum Error {
    /// No file handle was supplied to the pipeline
    #[error("no file handle supplied to the analysis pipeline")]
    NullInput,

    /// The resolver produced no handle for the requested file id
    #[error("file {file_id} not found by the file resolver")]
    FileNotFound { file_id: FileId },

    /// The resolver itself faulted
    #[error("failed to resolve file {file_id}")]
    Resolve {
        file_id: FileId,
        #[source]
        source: anyhow::Error,
    },

    /// The exclusion policy faulted
    #[error("exclusion check failed for file {file_id}")]
    Exclusion {
        file_id: FileId,
        #[source]
        source: anyhow::Error,
    },

    /// The content store could not produce the on-disk copy
    #[error("failed to materialize file {file_id} for analysis")]
    Materialize {
        file_id: FileId,
        #[source]
        source: anyhow::Error,
    },

    /// The content store could not delete the staged copy
    #[error("failed to delete the staged copy of file {file_id}")]
    Cleanup {
        file_id: FileId,
        #[source]
        source: anyhow::Error,
    },

    /// A module invocation faulted (distinct from a reported `Fail` outcome)
    #[error("module {module_id} faulted while processing file {file_id}")]
    Module {
        file_id: FileId,
        module_id: ModuleId,
        #[source]
        source: anyhow::Error,
    },

    /// A status or record write faulted
    #[error("status store write failed for file {file_id}")]
    StatusStore {
        file_id: FileId,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub fn resolve(file_id: FileId, source: anyhow::Error) -> Self {
        Self::Resolve { file_id, source }
    }

    pub fn exclusion(file_id: FileId, source: anyhow::Error) -> Self {
        Self::Exclusion { file_id, source }
    }

    pub fn materialize(file_id: FileId, source: anyhow::Error) -> Self {
        Self::Materialize { file_id, source }
    }

    pub fn cleanup(file_id: FileId, source: anyhow::Error) -> Self {
        Self::Cleanup { file_id, source }
    }

    pub fn module(file_id: FileId, module_id: ModuleId, source: anyhow::Error) -> Self {
        Self::Module {
            file_id,
            module_id,
            source,
        }
    }

    pub fn status_store(file_id: FileId, source: anyhow::Error) -> Self {
        Self::StatusStore { file_id, source }
    }

    /// True when the failure was raised before any database mutation
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::NullInput | Error::FileNotFound { .. } | Error::Resolve { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
