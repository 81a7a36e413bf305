use std::path::{Path, PathBuf};

use crate::catalog::Chipset;
use crate::project::BuildMode;

/// Logical layout of an FT9xx project on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Root directory of the project.
    pub root: PathBuf,
    /// Directory for tool metadata (.ft9xx).
    pub meta_dir: PathBuf,
    /// Path to the project config file (JSON).
    pub project_config_path: PathBuf,
    /// Lock file held while a command reads and rewrites the project.
    pub lock_path: PathBuf,
    /// Path to the generated build descriptor (CMakeLists.txt).
    pub descriptor_path: PathBuf,
    /// Application sources (Sources).
    pub sources_dir: PathBuf,
    /// Application headers (Includes).
    pub includes_dir: PathBuf,
}

impl ProjectLayout {
    /// Compute the default layout for a project rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".ft9xx");
        let project_config_path = meta_dir.join("project.json");
        let lock_path = meta_dir.join("lock");
        let descriptor_path = root.join("CMakeLists.txt");
        let sources_dir = root.join("Sources");
        let includes_dir = root.join("Includes");

        Self {
            root,
            meta_dir,
            project_config_path,
            lock_path,
            descriptor_path,
            sources_dir,
            includes_dir,
        }
    }

    /// Build output directory for a chipset/mode pair, e.g. `FT90x_Debug`.
    pub fn build_output_dir(&self, chipset: Chipset, mode: BuildMode) -> PathBuf {
        self.root.join(format!("{}_{}", chipset, mode))
    }

    /// Default firmware image: `<chipset>_<mode>/<project name>.elf`.
    pub fn default_elf_path(
        &self,
        project_name: &str,
        chipset: Chipset,
        mode: BuildMode,
    ) -> PathBuf {
        self.build_output_dir(chipset, mode).join(format!("{project_name}.elf"))
    }
}
