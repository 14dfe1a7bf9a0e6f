//! Sequential file analysis pipeline: runner and builder

pub mod builder;
pub mod runner;

pub use builder::PipelineBuilder;
pub use runner::FilePipeline;
