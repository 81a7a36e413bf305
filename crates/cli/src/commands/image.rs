use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use ft9xx_core::project::{load_project_config, ProjectConfig, ProjectLayout};
use ft9xx_core::services::toolchain::{self, ToolchainConfig, ToolchainPaths};
use ft9xx_core::toolchain::{ImageSizeSummary, Symbol};
use serde::Serialize;

use crate::commands::{image_sha256, resolve_path};

#[derive(Serialize)]
pub struct ImageSizeReport {
    pub image: String,
    pub sha256: String,
    pub analyzed_at: String,
    pub flash_bytes: u64,
    pub ram_bytes: u64,
    pub summary: ImageSizeSummary,
}

#[derive(Serialize)]
pub struct SymbolReport<'a> {
    pub image: String,
    pub sha256: String,
    pub analyzed_at: String,
    pub symbol_count: usize,
    /// Section filter, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<&'a str>,
    pub symbols: Vec<&'a Symbol>,
}

/// Image to analyze plus the toolchain to analyze it with.
#[derive(Debug)]
pub struct ImageTarget {
    pub elf: PathBuf,
    pub tools: ToolchainPaths,
}

/// Resolve the ELF and toolchain paths for an analysis command.
///
/// An explicit `--elf` wins; otherwise the project's default image
/// (`<chipset>_<mode>/<name>.elf`) is used, which requires a project config.
/// Toolchain overrides come from the project config when one exists.
pub fn resolve_image_target(root: &str, elf: Option<&str>) -> Result<ImageTarget> {
    let root_path = resolve_path(root)?;
    let layout = ProjectLayout::new(&root_path);
    let config: Option<ProjectConfig> = if layout.project_config_path.exists() {
        Some(load_project_config(&layout)?)
    } else {
        None
    };

    let elf = match (elf, &config) {
        (Some(path), _) => resolve_path(path)?,
        (None, Some(cfg)) => layout.default_elf_path(&cfg.name, cfg.chipset, cfg.build_mode),
        (None, None) => bail!(
            "No --elf given and no project config at {}",
            layout.project_config_path.display()
        ),
    };
    let tools = ToolchainPaths::resolve(
        config.as_ref().map(|cfg| &cfg.toolchain).unwrap_or(&ToolchainConfig::default()),
    );
    tracing::debug!(elf = %elf.display(), size = %tools.size.display(), "Resolved image target");
    Ok(ImageTarget { elf, tools })
}

/// Report flash/RAM usage of a firmware image.
pub fn image_size_command(root: &str, elf: Option<&str>, json: bool) -> Result<()> {
    let target = resolve_image_target(root, elf)?;
    let summary = toolchain::image_size(&target.tools, &target.elf)
        .with_context(|| format!("Failed to size image {}", target.elf.display()))?;

    if json {
        let report = ImageSizeReport {
            image: target.elf.display().to_string(),
            sha256: image_sha256(&target.elf)?,
            analyzed_at: Utc::now().to_rfc3339(),
            flash_bytes: summary.flash_bytes(),
            ram_bytes: summary.ram_bytes(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Image: {}", target.elf.display());
    println!("  text: {:#x} ({} bytes)", summary.text, summary.text);
    println!("  data: {:#x} ({} bytes)", summary.data, summary.data);
    println!("  bss:  {:#x} ({} bytes)", summary.bss, summary.bss);
    println!("  total: {} ({:#x})", summary.dec, summary.hex);
    println!("  Flash: {} bytes", summary.flash_bytes());
    println!("  RAM: {} bytes", summary.ram_bytes());
    Ok(())
}

/// List symbols of a firmware image, optionally filtered to one section or
/// limited to the `top` largest.
pub fn symbols_command(
    root: &str,
    elf: Option<&str>,
    section: Option<&str>,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let target = resolve_image_target(root, elf)?;
    let table = toolchain::symbol_table(&target.tools, &target.elf)
        .with_context(|| format!("Failed to read symbols of {}", target.elf.display()))?;

    let symbols: Vec<&Symbol> = match section {
        Some(name) => {
            let Some(entries) = table.section(name) else {
                bail!("Section '{}' not found in {}", name, target.elf.display());
            };
            let mut symbols: Vec<&Symbol> = entries.iter().collect();
            if let Some(limit) = top {
                // Stable sort keeps address order among equal sizes.
                symbols.sort_by(|a, b| b.size.cmp(&a.size));
                symbols.truncate(limit);
            }
            symbols
        }
        None => match top {
            Some(limit) => table.largest(limit),
            None => table.sections.values().flatten().collect(),
        },
    };

    if json {
        let report = SymbolReport {
            image: target.elf.display().to_string(),
            sha256: image_sha256(&target.elf)?,
            analyzed_at: Utc::now().to_rfc3339(),
            symbol_count: table.symbol_count(),
            section,
            symbols,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Symbols in {} ({} total):", table.binary_file, table.symbol_count());
    if symbols.is_empty() {
        println!("  (none)");
    }
    for sym in symbols {
        let hidden = if sym.hidden { " [hidden]" } else { "" };
        println!("  {:>8} {:>8} {:<12} {}{hidden}", sym.address, sym.size, sym.section, sym.name);
    }
    Ok(())
}
