use std::env;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ft9xx_core::catalog::Chipset;
use ft9xx_core::descriptor::seed_document;
use ft9xx_core::project::{ProjectConfig, ProjectContext, ProjectLayout};
use ft9xx_core::selection::UnsupportedItem;
use ft9xx_core::services::workspace::{write_atomic, DocumentStatus, SynthesisOutcome};
use sha2::{Digest, Sha256};

const FALLBACK_PROJECT_NAME: &str = "ft9xx-project";

/// Turn a `--root`/`--elf` argument into an absolute path.
///
/// `.` is the working directory. Existing paths are canonicalized; paths that
/// do not exist yet (a root about to be initialized) are joined onto the
/// working directory as given.
pub fn resolve_path(arg: &str) -> Result<PathBuf> {
    let cwd = || env::current_dir().context("Failed to get current directory");
    let path = Path::new(arg);
    if path == Path::new(".") {
        return cwd();
    }
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(_) => Ok(cwd()?.join(path)),
    }
}

/// Project name for `init-project` without `--name`: the root's directory
/// name, with characters CMake would choke on in `set(PROJECT_NAME ...)`
/// replaced by `_`.
pub fn default_project_name(root: &Path) -> String {
    let Some(dir) = root.file_name().and_then(|name| name.to_str()) else {
        return FALLBACK_PROJECT_NAME.to_string();
    };
    dir.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') { c } else { '_' })
        .collect()
}

/// Hex SHA-256 of a firmware image, for analysis reports.
pub fn image_sha256(path: &Path) -> Result<String> {
    let mut image = File::open(path)
        .with_context(|| format!("Failed to open image for hashing: {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut image, &mut hasher)
        .with_context(|| format!("Failed to hash image: {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Resolve `root` and load its project context, holding the project lock
/// until the returned context is dropped.
pub fn open_project(root: &str) -> Result<ProjectContext> {
    let root_path = resolve_path(root)?;
    ProjectContext::open_locked(&root_path)
}

/// Parse a chipset argument (`FT90x` / `FT93x`, any case).
pub fn parse_chipset(raw: &str) -> Result<Chipset> {
    Ok(raw.parse::<Chipset>()?)
}

/// Write the default descriptor if the project has none yet.
///
/// Returns true when a new descriptor was written.
pub fn seed_descriptor_if_missing(layout: &ProjectLayout, config: &ProjectConfig) -> Result<bool> {
    if layout.descriptor_path.exists() {
        return Ok(false);
    }
    write_atomic(&layout.descriptor_path, &seed_document(&config.name)).with_context(|| {
        format!("Failed to write build descriptor: {}", layout.descriptor_path.display())
    })?;
    tracing::info!(path = %layout.descriptor_path.display(), "Seeded default build descriptor");
    Ok(true)
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// One-line description of what a synthesis pass did to the descriptor.
pub fn describe_document_status(status: DocumentStatus, descriptor: &Path) -> String {
    match status {
        DocumentStatus::Missing => format!(
            "Build descriptor not found at {} (run `regenerate` to create it)",
            descriptor.display()
        ),
        DocumentStatus::Unchanged => {
            format!("Build descriptor up to date: {}", descriptor.display())
        }
        DocumentStatus::Rewritten => format!("Build descriptor updated: {}", descriptor.display()),
    }
}

pub fn print_outcome(outcome: &SynthesisOutcome, layout: &ProjectLayout) {
    println!("{}", describe_document_status(outcome.document, &layout.descriptor_path));
}

/// Format unsupported items as `name (kind)` joined by commas.
pub fn format_unsupported(items: &[UnsupportedItem]) -> String {
    items.iter().map(|item| format!("{} ({})", item.name, item.kind)).collect::<Vec<_>>().join(", ")
}
