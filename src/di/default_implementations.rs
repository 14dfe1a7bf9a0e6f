//! Default implementations for the pipeline collaborator traits
//!
//! In-process implementations suitable for embedding and for tests: an
//! in-memory file catalog that doubles as the status store, a
//! filesystem-backed staging area, and a config-driven exclusion policy.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::config::ExclusionConfig;
use crate::core::traits::{ContentStore, ExclusionPolicy, FileResolver, StatusStore};
use crate::core::types::{
    FileHandle, FileId, FileStatus, ModuleId, ModuleOutcome, ModuleOutcomeRecord,
};

/// One file known to the catalog
#[derive(Debug, Clone)]
struct CatalogEntry {
    handle: FileHandle,
    content: Vec<u8>,
}

/// In-memory file registry that also persists status transitions and
/// per-module outcome records
///
/// Implements both [`FileResolver`] and [`StatusStore`]; resolution returns a
/// snapshot of the registered handle, while commits update the registry.
#[derive(Default)]
pub struct InMemoryCatalog {
    entries: RwLock<HashMap<FileId, CatalogEntry>>,
    records: RwLock<Vec<ModuleOutcomeRecord>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and its content bytes
    pub fn insert(&self, handle: FileHandle, content: impl Into<Vec<u8>>) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            handle.id(),
            CatalogEntry {
                handle,
                content: content.into(),
            },
        );
    }

    /// Committed status for a file, if the file is known
    pub fn status_of(&self, file_id: FileId) -> Option<FileStatus> {
        let entries = self.entries.read().unwrap();
        entries.get(&file_id).map(|entry| entry.handle.status())
    }

    /// Content bytes registered for a file
    pub fn content_of(&self, file_id: FileId) -> Option<Vec<u8>> {
        let entries = self.entries.read().unwrap();
        entries.get(&file_id).map(|entry| entry.content.clone())
    }

    /// All module outcome records, in write order
    pub fn records(&self) -> Vec<ModuleOutcomeRecord> {
        self.records.read().unwrap().clone()
    }

    /// Module outcome records serialized as a JSON array
    pub fn export_records_json(&self) -> Result<String> {
        let records = self.records.read().unwrap();
        serde_json::to_string_pretty(&*records).context("failed to serialize outcome records")
    }
}

impl FileResolver for InMemoryCatalog {
    fn resolve(&self, file_id: FileId) -> Result<Option<FileHandle>> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(&file_id).map(|entry| entry.handle.clone()))
    }
}

impl StatusStore for InMemoryCatalog {
    fn record_module_outcome(
        &self,
        file_id: FileId,
        module_id: ModuleId,
        outcome: ModuleOutcome,
    ) -> Result<()> {
        self.records.write().unwrap().push(ModuleOutcomeRecord {
            file_id,
            module_id,
            outcome,
        });
        Ok(())
    }

    fn commit_file_status(&self, file_id: FileId, status: FileStatus) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        match entries.get_mut(&file_id) {
            Some(entry) => {
                entry.handle.set_status(status);
                Ok(())
            }
            None => bail!("file {file_id} is not registered in the catalog"),
        }
    }
}

/// Filesystem-backed content store staging files under a single root
/// directory, flat by file id
///
/// Content bytes come from the catalog the store is built over.
pub struct StagingStore {
    root: PathBuf,
    catalog: Arc<InMemoryCatalog>,
}

impl StagingStore {
    pub fn new(root: impl Into<PathBuf>, catalog: Arc<InMemoryCatalog>) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    fn staged_path(&self, file_id: FileId) -> PathBuf {
        self.root.join(file_id.to_string())
    }
}

impl ContentStore for StagingStore {
    fn materialize(&self, file: &mut FileHandle) -> Result<()> {
        let content = self
            .catalog
            .content_of(file.id())
            .with_context(|| format!("no content registered for file {}", file.id()))?;

        fs::create_dir_all(&self.root).with_context(|| {
            format!("failed to create staging directory {}", self.root.display())
        })?;
        let path = self.staged_path(file.id());
        fs::write(&path, content)
            .with_context(|| format!("failed to stage file {} at {}", file.id(), path.display()))?;

        file.set_materialized(path);
        Ok(())
    }

    fn delete(&self, file: &mut FileHandle) -> Result<()> {
        let path = file
            .local_path()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.staged_path(file.id()));

        if path.exists() {
            fs::remove_file(&path).with_context(|| {
                format!(
                    "failed to delete staged copy of file {} at {}",
                    file.id(),
                    path.display()
                )
            })?;
        }

        file.clear_materialized();
        Ok(())
    }
}

/// Exclusion policy driven by [`ExclusionConfig`] rules: extension,
/// name-substring, and maximum size
#[derive(Default)]
pub struct RuleBasedExclusionPolicy {
    config: ExclusionConfig,
}

impl RuleBasedExclusionPolicy {
    pub fn new(mut config: ExclusionConfig) -> Self {
        config.normalize();
        Self { config }
    }
}

impl ExclusionPolicy for RuleBasedExclusionPolicy {
    fn should_exclude(&self, file: &FileHandle) -> Result<bool> {
        if let Some(max) = self.config.max_file_size {
            if file.size() > max {
                return Ok(true);
            }
        }

        if let Some(ext) = file.extension() {
            let ext = ext.to_ascii_lowercase();
            if self.config.extensions.iter().any(|rule| *rule == ext) {
                return Ok(true);
            }
        }

        let name = file.name().to_ascii_lowercase();
        if self
            .config
            .name_contains
            .iter()
            .any(|needle| name.contains(needle))
        {
            return Ok(true);
        }

        Ok(false)
    }
}
