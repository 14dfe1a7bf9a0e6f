// Test utility module for fileprobe integration tests
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fileprobe::{
    AnalysisModule, ContentStore, ExclusionPolicy, FileHandle, FileId, FileOrigin, FileResolver,
    FileStatus, ModuleId, ModuleOutcome, ModuleOutcomeRecord, PipelineBuilder, StatusStore,
};

/// Behavior of a scripted test module
pub enum ModuleScript {
    /// Return this outcome
    Outcome(ModuleOutcome),
    /// Fault with this message
    Fault(&'static str),
    /// Set this status on the handle, then return the outcome
    SetStatus(FileStatus, ModuleOutcome),
}

/// Module whose behavior is scripted by the test; counts invocations and logs
/// whether the file existed on disk at invoke time
pub struct ScriptedModule {
    id: ModuleId,
    script: ModuleScript,
    requires_file: bool,
    invocations: Arc<AtomicUsize>,
    saw_exists: Arc<Mutex<Vec<bool>>>,
}

impl ScriptedModule {
    pub fn new(id: u32, outcome: ModuleOutcome) -> Self {
        Self::with_script(id, ModuleScript::Outcome(outcome))
    }

    pub fn faulting(id: u32, message: &'static str) -> Self {
        Self::with_script(id, ModuleScript::Fault(message))
    }

    pub fn setting_status(id: u32, status: FileStatus, outcome: ModuleOutcome) -> Self {
        Self::with_script(id, ModuleScript::SetStatus(status, outcome))
    }

    fn with_script(id: u32, script: ModuleScript) -> Self {
        Self {
            id: ModuleId(id),
            script,
            requires_file: false,
            invocations: Arc::new(AtomicUsize::new(0)),
            saw_exists: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requiring_file(mut self) -> Self {
        self.requires_file = true;
        self
    }

    /// Shared invocation counter, cloned out before the module is moved into
    /// the pipeline
    pub fn invocation_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.invocations)
    }

    /// Shared log of `file.exists()` as observed at each invocation
    pub fn exists_log(&self) -> Arc<Mutex<Vec<bool>>> {
        Arc::clone(&self.saw_exists)
    }
}

impl AnalysisModule for ScriptedModule {
    fn module_id(&self) -> ModuleId {
        self.id
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn requires_materialized_file(&self) -> bool {
        self.requires_file
    }

    fn invoke(&self, file: &mut FileHandle) -> Result<ModuleOutcome> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.saw_exists.lock().unwrap().push(file.exists());
        match &self.script {
            ModuleScript::Outcome(outcome) => Ok(*outcome),
            ModuleScript::Fault(message) => Err(anyhow!(*message)),
            ModuleScript::SetStatus(status, outcome) => {
                file.set_status(*status);
                Ok(*outcome)
            }
        }
    }
}

/// Status store that records every write and can be told to fail record
/// writes
#[derive(Default)]
pub struct RecordingStore {
    records: Mutex<Vec<ModuleOutcomeRecord>>,
    commits: Mutex<Vec<(FileId, FileStatus)>>,
    fail_records: bool,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_records() -> Arc<Self> {
        Arc::new(Self {
            fail_records: true,
            ..Default::default()
        })
    }

    pub fn records(&self) -> Vec<ModuleOutcomeRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn commits(&self) -> Vec<(FileId, FileStatus)> {
        self.commits.lock().unwrap().clone()
    }

    pub fn last_commit(&self) -> Option<(FileId, FileStatus)> {
        self.commits.lock().unwrap().last().copied()
    }
}

impl StatusStore for RecordingStore {
    fn record_module_outcome(
        &self,
        file_id: FileId,
        module_id: ModuleId,
        outcome: ModuleOutcome,
    ) -> Result<()> {
        if self.fail_records {
            return Err(anyhow!("record store unavailable"));
        }
        self.records.lock().unwrap().push(ModuleOutcomeRecord {
            file_id,
            module_id,
            outcome,
        });
        Ok(())
    }

    fn commit_file_status(&self, file_id: FileId, status: FileStatus) -> Result<()> {
        self.commits.lock().unwrap().push((file_id, status));
        Ok(())
    }
}

/// Content store that flips handle flags without touching a real disk
#[derive(Default)]
pub struct FakeContent {
    materialize_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_materialize: bool,
}

impl FakeContent {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_materialize: true,
            ..Default::default()
        })
    }

    pub fn materialize_calls(&self) -> usize {
        self.materialize_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

impl ContentStore for FakeContent {
    fn materialize(&self, file: &mut FileHandle) -> Result<()> {
        self.materialize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_materialize {
            return Err(anyhow!("content service unavailable"));
        }
        file.set_materialized(format!("/staging/{}", file.id()));
        Ok(())
    }

    fn delete(&self, file: &mut FileHandle) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        file.clear_materialized();
        Ok(())
    }
}

/// Exclusion policy with a fixed answer and a call counter
pub struct StaticExclusion {
    exclude: bool,
    fault: bool,
    calls: AtomicUsize,
}

impl StaticExclusion {
    pub fn allow_all() -> Arc<Self> {
        Arc::new(Self {
            exclude: false,
            fault: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn exclude_all() -> Arc<Self> {
        Arc::new(Self {
            exclude: true,
            fault: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn faulting() -> Arc<Self> {
        Arc::new(Self {
            exclude: false,
            fault: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExclusionPolicy for StaticExclusion {
    fn should_exclude(&self, _file: &FileHandle) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fault {
            return Err(anyhow!("exclusion rules unavailable"));
        }
        Ok(self.exclude)
    }
}

/// Resolver over a fixed map of handles
#[derive(Default)]
pub struct MapResolver {
    handles: Mutex<HashMap<FileId, FileHandle>>,
}

impl MapResolver {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(handle: FileHandle) -> Arc<Self> {
        let resolver = Self::default();
        resolver
            .handles
            .lock()
            .unwrap()
            .insert(handle.id(), handle);
        Arc::new(resolver)
    }
}

impl FileResolver for MapResolver {
    fn resolve(&self, file_id: FileId) -> Result<Option<FileHandle>> {
        Ok(self.handles.lock().unwrap().get(&file_id).cloned())
    }
}

/// Bundle of fakes plus a builder wired over them
pub struct TestHarness {
    pub store: Arc<RecordingStore>,
    pub content: Arc<FakeContent>,
    pub exclusion: Arc<StaticExclusion>,
    pub resolver: Arc<MapResolver>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            store: RecordingStore::new(),
            content: FakeContent::new(),
            exclusion: StaticExclusion::allow_all(),
            resolver: MapResolver::empty(),
        }
    }

    pub fn builder(&self) -> PipelineBuilder {
        PipelineBuilder::new(
            Arc::clone(&self.resolver) as _,
            Arc::clone(&self.content) as _,
            Arc::clone(&self.exclusion) as _,
            Arc::clone(&self.store) as _,
        )
    }
}

/// A pipeline-owned file ready for analysis
pub fn ready_file(id: u64) -> FileHandle {
    FileHandle::new(FileId(id), "evidence.bin", FileOrigin::FileSystem)
        .with_status(FileStatus::ReadyForAnalysis)
}
