//! Core types, errors, and collaborator contracts for the analysis pipeline

pub mod errors;
pub mod traits;
pub mod types;

pub use errors::{Error, Result};
pub use traits::{AnalysisModule, ContentStore, ExclusionPolicy, FileResolver, StatusStore};
pub use types::{
    FileHandle, FileId, FileOrigin, FileStatus, ModuleId, ModuleOutcome, ModuleOutcomeRecord,
    RunOutcome,
};
