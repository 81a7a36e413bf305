//! On-disk project: layout, JSON config, and the context tying them to a
//! workspace.

mod config;
mod layout;
mod lock;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::services::workspace::{
    write_atomic, FileDescriptorStore, WorkspaceContext, WorkspaceId,
};

pub use config::{BuildMode, ProjectConfig};
pub use layout::ProjectLayout;
pub use lock::{ProjectLock, DEFAULT_LOCK_WAIT};

/// Load the project config JSON from disk for a given layout.
pub fn load_project_config(layout: &ProjectLayout) -> Result<ProjectConfig> {
    let config_json = fs::read_to_string(&layout.project_config_path).with_context(|| {
        format!("Failed to read project config at {}", layout.project_config_path.display())
    })?;
    let config: ProjectConfig =
        serde_json::from_str(&config_json).context("Failed to parse project config JSON")?;
    Ok(config)
}

/// Write the project config JSON (pretty-printed) for a given layout.
pub fn save_project_config(layout: &ProjectLayout, config: &ProjectConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    write_atomic(&layout.project_config_path, &json).with_context(|| {
        format!("Failed to write project config: {}", layout.project_config_path.display())
    })
}

/// Layout, config, and a workspace context bound to the project's descriptor.
#[derive(Debug)]
pub struct ProjectContext {
    pub layout: ProjectLayout,
    pub config: ProjectConfig,
    pub workspace: WorkspaceContext,
    lock: Option<ProjectLock>,
}

impl ProjectContext {
    /// Load project config and set up the workspace for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        Self::load(ProjectLayout::new(root), None)
    }

    /// Like `from_root`, but first takes the project lock and keeps it until
    /// the context is dropped, so the config read and every write made
    /// through this context happen without another process interleaving.
    pub fn open_locked(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ProjectLayout::new(root);
        // Without a meta dir there is no project; let the config load report it.
        let lock =
            if layout.meta_dir.is_dir() { Some(ProjectLock::acquire(&layout)?) } else { None };
        Self::load(layout, lock)
    }

    fn load(layout: ProjectLayout, lock: Option<ProjectLock>) -> Result<Self> {
        let config = load_project_config(&layout)?;
        let workspace = WorkspaceContext::new(
            WorkspaceId::new(&layout.root),
            config.selection.clone(),
            FileDescriptorStore::new(&layout.descriptor_path),
        );
        Ok(Self { layout, config, workspace, lock })
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// Copy the workspace's current selection into the config and save it.
    pub fn persist_selection(&mut self) -> Result<()> {
        self.config.selection = self.workspace.selection()?;
        save_project_config(&self.layout, &self.config)
    }
}
