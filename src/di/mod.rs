//! Default implementations of the pipeline's collaborator traits

pub mod default_implementations;

pub use default_implementations::{InMemoryCatalog, RuleBasedExclusionPolicy, StagingStore};
