// Export modules for library usage
pub mod config;
pub mod core;
pub mod di;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{
    AnalysisModule, ContentStore, Error, ExclusionPolicy, FileHandle, FileId, FileOrigin,
    FileResolver, FileStatus, ModuleId, ModuleOutcome, ModuleOutcomeRecord, Result, RunOutcome,
    StatusStore,
};

pub use crate::config::{ExclusionConfig, PipelineConfig};
pub use crate::di::{InMemoryCatalog, RuleBasedExclusionPolicy, StagingStore};
pub use crate::pipeline::{FilePipeline, PipelineBuilder};
