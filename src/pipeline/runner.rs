//! Pipeline runner: one end-to-end pass of a file through the module list

use std::sync::Arc;

use crate::core::errors::{Error, Result};
use crate::core::traits::{
    AnalysisModule, ContentStore, ExclusionPolicy, FileResolver, StatusStore,
};
use crate::core::types::{FileHandle, FileId, FileStatus, ModuleOutcome, RunOutcome};

/// Runs files through an ordered list of analysis modules.
///
/// Collaborators are injected at construction via [`PipelineBuilder`]; the
/// runner holds no global state. A run is synchronous and strictly sequential:
/// later modules may depend on side effects of earlier ones. Concurrent runs
/// against distinct file ids are safe as long as the injected services are;
/// runs against the same file id must be serialized by the caller, since the
/// eligibility gate is a check-then-act sequence.
///
/// [`PipelineBuilder`]: crate::pipeline::PipelineBuilder
pub struct FilePipeline {
    pub(crate) modules: Vec<Box<dyn AnalysisModule>>,
    pub(crate) has_exe_module: bool,
    pub(crate) resolver: Arc<dyn FileResolver>,
    pub(crate) content: Arc<dyn ContentStore>,
    pub(crate) exclusion: Arc<dyn ExclusionPolicy>,
    pub(crate) store: Arc<dyn StatusStore>,
}

impl FilePipeline {
    /// Number of registered modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// True when at least one module needs the file on disk
    pub fn has_exe_module(&self) -> bool {
        self.has_exe_module
    }

    /// Resolve `file_id` and run it through the pipeline.
    ///
    /// With an empty module list this is a no-op that does not even consult
    /// the resolver. An unknown id is a precondition violation raised before
    /// any database mutation.
    pub fn run(&self, file_id: FileId) -> Result<RunOutcome> {
        if self.modules.is_empty() {
            return Ok(RunOutcome::NoModules);
        }

        let mut file = match self.resolver.resolve(file_id) {
            Ok(Some(file)) => file,
            Ok(None) => {
                log::error!("file {file_id} not found by the file resolver");
                return Err(Error::FileNotFound { file_id });
            }
            Err(source) => {
                log::error!("failed to resolve file {file_id}: {source:#}");
                return Err(Error::resolve(file_id, source));
            }
        };

        self.run_file(Some(&mut file))
    }

    /// Run an already-resolved handle through the pipeline.
    ///
    /// `None` is a caller programming error ([`Error::NullInput`]), logged and
    /// raised without touching the status store — unless the module list is
    /// empty, in which case the call is a no-op for any input.
    ///
    /// Any fault past the precondition checks force-commits
    /// `AnalysisFailed` for the file before propagating, so the persisted
    /// record never stays at `AnalysisInProgress` after a failed run.
    pub fn run_file(&self, file: Option<&mut FileHandle>) -> Result<RunOutcome> {
        if self.modules.is_empty() {
            return Ok(RunOutcome::NoModules);
        }

        let file = match file {
            Some(file) => file,
            None => {
                log::error!("analysis pipeline invoked without a file handle");
                return Err(Error::NullInput);
            }
        };

        let file_id = file.id();
        match self.process(file) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                log::error!("error while processing file {file_id}: {err}");
                // Compensating write, bypassing the still-in-progress guard:
                // the normal bookkeeping may not have run at all.
                if let Err(commit_err) = self
                    .store
                    .commit_file_status(file_id, FileStatus::AnalysisFailed)
                {
                    log::error!(
                        "failed to record failed status for file {file_id}: {commit_err:#}"
                    );
                }
                Err(err)
            }
        }
    }

    fn process(&self, file: &mut FileHandle) -> Result<RunOutcome> {
        let file_id = file.id();

        if self
            .exclusion
            .should_exclude(file)
            .map_err(|source| Error::exclusion(file_id, source))?
        {
            log::debug!("file {file_id} ({}) excluded from analysis", file.name());
            self.set_status(file, FileStatus::AnalysisSkipped)?;
            return Ok(RunOutcome::Excluded);
        }

        // Already processed, already skipped, or not yet eligible. Not an
        // error: this gate makes double-processing idempotent.
        if file.status() != FileStatus::ReadyForAnalysis {
            log::debug!(
                "file {file_id} is {} rather than ready-for-analysis, leaving untouched",
                file.status()
            );
            return Ok(RunOutcome::NotEligible(file.status()));
        }

        // Durable marker before the first module runs: a crash mid-pipeline
        // must leave "in progress" behind, never a stale "ready".
        self.set_status(file, FileStatus::AnalysisInProgress)?;

        if self.has_exe_module && !file.exists() {
            self.content
                .materialize(file)
                .map_err(|source| Error::materialize(file_id, source))?;
        }

        let loop_result = self.run_modules(file);
        // The staged copy is released on every path past materialization; a
        // delete fault while a module fault is already in flight is logged
        // rather than raised so it cannot mask the original error.
        let cleanup_result = self.cleanup(file, loop_result.is_err());
        let (modules_run, failures, stopped_early) = loop_result?;
        cleanup_result?;

        // Modules may set their own terminal status; only fill one in when
        // they have not, then persist whatever the handle carries.
        if file.status() == FileStatus::AnalysisInProgress {
            if failures > 0 {
                file.set_status(FileStatus::AnalysisFailed);
            } else {
                file.set_status(FileStatus::AnalysisComplete);
            }
        }
        self.store
            .commit_file_status(file_id, file.status())
            .map_err(|source| Error::status_store(file_id, source))?;

        Ok(RunOutcome::Analyzed {
            modules_run,
            failures,
            stopped_early,
        })
    }

    /// Invoke each module in registration order, recording every outcome.
    ///
    /// Returns `(modules_run, failures, stopped_early)`.
    fn run_modules(&self, file: &mut FileHandle) -> Result<(usize, usize, bool)> {
        let file_id = file.id();
        let mut modules_run = 0;
        let mut failures = 0;

        for module in &self.modules {
            let outcome = module
                .invoke(file)
                .map_err(|source| Error::module(file_id, module.module_id(), source))?;

            self.store
                .record_module_outcome(file_id, module.module_id(), outcome)
                .map_err(|source| Error::status_store(file_id, source))?;
            modules_run += 1;

            match outcome {
                ModuleOutcome::Ok => {}
                ModuleOutcome::Fail => {
                    log::warn!(
                        "module {} ({}) reported failure for file {file_id}",
                        module.module_id(),
                        module.name()
                    );
                    failures += 1;
                }
                ModuleOutcome::Stop => {
                    log::debug!(
                        "module {} ({}) stopped the pipeline for file {file_id}",
                        module.module_id(),
                        module.name()
                    );
                    return Ok((modules_run, failures, true));
                }
            }
        }

        Ok((modules_run, failures, false))
    }

    /// Delete the staged copy unless the content is externally owned.
    ///
    /// Carved and derived content is produced by external tools and is never
    /// deleted here, whatever the module outcomes were.
    fn cleanup(&self, file: &mut FileHandle, best_effort: bool) -> Result<()> {
        if file.origin().is_externally_owned() || !file.exists() {
            return Ok(());
        }

        match self.content.delete(file) {
            Ok(()) => Ok(()),
            Err(source) if best_effort => {
                log::error!(
                    "failed to delete staged copy of file {}: {source:#}",
                    file.id()
                );
                Ok(())
            }
            Err(source) => Err(Error::cleanup(file.id(), source)),
        }
    }

    /// Mutate the in-memory status and commit it in the same step
    fn set_status(&self, file: &mut FileHandle, status: FileStatus) -> Result<()> {
        file.set_status(status);
        self.store
            .commit_file_status(file.id(), status)
            .map_err(|source| Error::status_store(file.id(), source))
    }
}
