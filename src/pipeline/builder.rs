//! Fluent builder for assembling a file pipeline

use std::sync::Arc;

use crate::core::traits::{
    AnalysisModule, ContentStore, ExclusionPolicy, FileResolver, StatusStore,
};
use crate::pipeline::runner::FilePipeline;

/// Builder for [`FilePipeline`].
///
/// Modules run in registration order; the order is a contract, not
/// incidental. The aggregate "needs the file on disk" flag is computed once
/// at [`build`](PipelineBuilder::build).
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::new(resolver, content, exclusion, store)
///     .module(HashModule::new())
///     .module(SignatureModule::new())
///     .when(config.entropy_enabled, |b| b.module(EntropyModule::new()))
///     .build();
/// ```
pub struct PipelineBuilder {
    modules: Vec<Box<dyn AnalysisModule>>,
    resolver: Arc<dyn FileResolver>,
    content: Arc<dyn ContentStore>,
    exclusion: Arc<dyn ExclusionPolicy>,
    store: Arc<dyn StatusStore>,
}

impl PipelineBuilder {
    /// Create a builder over the injected collaborators
    pub fn new(
        resolver: Arc<dyn FileResolver>,
        content: Arc<dyn ContentStore>,
        exclusion: Arc<dyn ExclusionPolicy>,
        store: Arc<dyn StatusStore>,
    ) -> Self {
        Self {
            modules: Vec::new(),
            resolver,
            content,
            exclusion,
            store,
        }
    }

    /// Append a module; registration order is execution order
    pub fn module(mut self, module: impl AnalysisModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Append an already-boxed module
    pub fn boxed_module(mut self, module: Box<dyn AnalysisModule>) -> Self {
        self.modules.push(module);
        self
    }

    /// Apply `f` when `condition` holds.
    ///
    /// Useful for modules that are only registered under certain
    /// configurations.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// Build the pipeline, computing the materialization flag once
    pub fn build(self) -> FilePipeline {
        let has_exe_module = self
            .modules
            .iter()
            .any(|module| module.requires_materialized_file());

        FilePipeline {
            modules: self.modules,
            has_exe_module,
            resolver: self.resolver,
            content: self.content,
            exclusion: self.exclusion,
            store: self.store,
        }
    }
}
