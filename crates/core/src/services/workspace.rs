use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Chipset;
use crate::descriptor;
use crate::selection::{
    AggregateBuildInputs, LibrarySelectionAggregator, PrebuiltKind, SelectionError,
    SelectionState, UnsupportedItem,
};

/// Identity of a workspace (its root directory).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceId(PathBuf);

impl WorkspaceId {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self(root.as_ref().to_path_buf())
    }

    pub fn root(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Where the descriptor document is read from and written back to.
pub trait DescriptorStore: Send + Sync {
    /// `Ok(None)` when no document exists yet.
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, text: &str) -> io::Result<()>;
}

/// Descriptor stored as a file on disk (normally `<root>/CMakeLists.txt`).
#[derive(Debug, Clone)]
pub struct FileDescriptorStore {
    path: PathBuf,
}

impl FileDescriptorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DescriptorStore for FileDescriptorStore {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, text: &str) -> io::Result<()> {
        write_atomic(&self.path, text)
    }
}

/// Write `contents` to a sibling temp file, then rename it over `path`, so
/// readers never see a half-written file.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

/// In-memory descriptor, e.g. an unsaved editor buffer.
#[derive(Debug, Default)]
pub struct MemoryDescriptorStore {
    text: Mutex<Option<String>>,
}

impl MemoryDescriptorStore {
    pub fn new(text: Option<String>) -> Self {
        Self { text: Mutex::new(text) }
    }

    pub fn contents(&self) -> Option<String> {
        self.text.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl DescriptorStore for MemoryDescriptorStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.contents())
    }

    fn save(&self, text: &str) -> io::Result<()> {
        let mut guard =
            self.text.lock().map_err(|_| io::Error::new(io::ErrorKind::Other, "store lock poisoned"))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("Descriptor store error: {0}")]
    Store(#[from] io::Error),
    #[error("Workspace {0} state lock poisoned")]
    Poisoned(WorkspaceId),
}

/// What a synthesis pass did to the stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// No document yet; nothing was written.
    Missing,
    Unchanged,
    Rewritten,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisOutcome {
    pub inputs: AggregateBuildInputs,
    pub document: DocumentStatus,
}

/// Explicit per-workspace context: selection state, aggregate, and the
/// descriptor store it renders into.
///
/// Every mutation holds the state lock across the whole
/// mutate → recompute → read → regenerate → write sequence, so at most one
/// change is in flight per workspace.
pub struct WorkspaceContext {
    id: WorkspaceId,
    state: Mutex<LibrarySelectionAggregator>,
    store: Box<dyn DescriptorStore>,
}

impl fmt::Debug for WorkspaceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceContext").field("id", &self.id).finish_non_exhaustive()
    }
}

impl WorkspaceContext {
    pub fn new(
        id: WorkspaceId,
        selection: SelectionState,
        store: impl DescriptorStore + 'static,
    ) -> Self {
        Self {
            id,
            state: Mutex::new(LibrarySelectionAggregator::new(selection)),
            store: Box::new(store),
        }
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    pub fn selection(&self) -> Result<SelectionState, WorkspaceError> {
        Ok(self.lock()?.selection().clone())
    }

    pub fn inputs(&self) -> Result<AggregateBuildInputs, WorkspaceError> {
        Ok(self.lock()?.inputs().clone())
    }

    pub fn add_hardware_library(&self, name: &str) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|agg| agg.add_hardware_library(name).map(drop))
    }

    pub fn add_third_party_library(&self, name: &str) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|agg| agg.add_third_party_library(name).map(drop))
    }

    pub fn add_layered_driver(&self, name: &str) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|agg| agg.add_layered_driver(name).map(drop))
    }

    pub fn remove_hardware_library(&self, name: &str) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|agg| {
            agg.remove_hardware_library(name);
            Ok(())
        })
    }

    pub fn remove_third_party_library(
        &self,
        name: &str,
    ) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|agg| {
            agg.remove_third_party_library(name);
            Ok(())
        })
    }

    pub fn remove_layered_driver(&self, name: &str) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|agg| {
            agg.remove_layered_driver(name);
            Ok(())
        })
    }

    pub fn set_prebuilt_kind(&self, kind: PrebuiltKind) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|agg| {
            agg.set_prebuilt_kind(kind);
            Ok(())
        })
    }

    pub fn set_custom_definitions(
        &self,
        definitions: Vec<String>,
    ) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|agg| agg.set_custom_definitions(definitions))
    }

    pub fn set_custom_linker_flags(
        &self,
        flags: Vec<String>,
    ) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|agg| agg.set_custom_linker_flags(flags))
    }

    /// Repair: re-render the stored document from the current selection.
    pub fn regenerate(&self) -> Result<SynthesisOutcome, WorkspaceError> {
        self.mutate(|_| Ok(()))
    }

    pub fn is_selection_supported_on(&self, chipset: Chipset) -> Result<bool, WorkspaceError> {
        Ok(self.lock()?.is_selection_supported_on(chipset))
    }

    pub fn unsupported_on(&self, chipset: Chipset) -> Result<Vec<UnsupportedItem>, WorkspaceError> {
        Ok(self.lock()?.unsupported_on(chipset))
    }

    fn lock(&self) -> Result<MutexGuard<'_, LibrarySelectionAggregator>, WorkspaceError> {
        self.state.lock().map_err(|_| WorkspaceError::Poisoned(self.id.clone()))
    }

    fn mutate<F>(&self, change: F) -> Result<SynthesisOutcome, WorkspaceError>
    where
        F: FnOnce(&mut LibrarySelectionAggregator) -> Result<(), SelectionError>,
    {
        let mut guard = self.lock()?;
        // Rejected changes leave the selection and the document as they were.
        change(&mut *guard)?;
        let inputs = guard.inputs().clone();

        let document = match self.store.load()? {
            None => {
                tracing::debug!(workspace = %self.id, "No descriptor yet; skipping synthesis");
                DocumentStatus::Missing
            }
            Some(current) => {
                let next = descriptor::regenerate(&current, &inputs);
                if next == current {
                    DocumentStatus::Unchanged
                } else {
                    self.store.save(&next)?;
                    tracing::info!(workspace = %self.id, "Build descriptor updated");
                    DocumentStatus::Rewritten
                }
            }
        };
        drop(guard);

        Ok(SynthesisOutcome { inputs, document })
    }
}
