use std::fs;

use anyhow::{bail, Context, Result};
use ft9xx_core::catalog::Chipset;
use ft9xx_core::descriptor::{DescriptorDocument, Region};
use ft9xx_core::project::{
    save_project_config, BuildMode, ProjectConfig, ProjectContext, ProjectLayout, ProjectLock,
};
use ft9xx_core::selection::{SelectionState, UnsupportedItem};
use serde::Serialize;

use crate::commands::{
    default_project_name, describe_document_status, format_unsupported, open_project,
    parse_chipset, print_dir_status, resolve_path, seed_descriptor_if_missing,
};

#[derive(Serialize)]
pub struct ProjectInfoSnapshot {
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub chipset: Chipset,
    pub build_mode: BuildMode,
    pub descriptor: DescriptorInfo,
    pub default_elf: String,
    pub selection: SelectionState,
    pub unsupported: Vec<ChipsetSupport>,
    pub layout: ProjectInfoLayout,
}

#[derive(Serialize)]
pub struct DescriptorInfo {
    pub path: String,
    pub exists: bool,
    /// Generated regions whose BEGIN/END markers were found.
    pub regions: Vec<Region>,
}

#[derive(Serialize)]
pub struct ChipsetSupport {
    pub chipset: Chipset,
    pub items: Vec<UnsupportedItem>,
}

#[derive(Serialize)]
pub struct ProjectInfoLayout {
    pub meta_dir: String,
    pub sources_dir: String,
    pub includes_dir: String,
}

/// Initialize a new project at `root`.
///
/// Creates `.ft9xx/project.json`, the `Sources`/`Includes` dirs, and a default
/// `CMakeLists.txt` when none exists. Refuses to overwrite an existing config.
pub fn init_project_command(root: &str, name: Option<String>, chipset: Option<&str>) -> Result<()> {
    let root_path = resolve_path(root)?;
    let layout = ProjectLayout::new(&root_path);

    if layout.project_config_path.exists() {
        bail!("Project already initialized at {}", layout.project_config_path.display());
    }

    let project_name = match name {
        Some(n) => n,
        None => default_project_name(&root_path),
    };
    let chipset = match chipset {
        Some(raw) => parse_chipset(raw)?,
        None => Chipset::Ft90x,
    };

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    fs::create_dir_all(&layout.sources_dir).with_context(|| {
        format!("Failed to create sources dir: {}", layout.sources_dir.display())
    })?;
    fs::create_dir_all(&layout.includes_dir).with_context(|| {
        format!("Failed to create includes dir: {}", layout.includes_dir.display())
    })?;

    let _lock = ProjectLock::acquire(&layout)?;
    let config = ProjectConfig::new(&project_name, chipset);
    save_project_config(&layout, &config)?;
    let seeded = seed_descriptor_if_missing(&layout, &config)?;

    // An existing descriptor picks up the (empty) generated regions right away.
    let ctx = ProjectContext::from_root(&root_path)?;
    let outcome = ctx.workspace.regenerate()?;

    println!("Initialized FT9xx project:");
    println!("  Name: {}", project_name);
    println!("  Root: {}", layout.root.display());
    println!("  Chipset: {}", config.chipset);
    println!("  Build mode: {}", config.build_mode);
    println!("  Config: {}", layout.project_config_path.display());
    if seeded {
        println!("  Descriptor: {} (default template)", layout.descriptor_path.display());
    } else {
        println!("  {}", describe_document_status(outcome.document, &layout.descriptor_path));
    }
    println!("  Sources dir: {}", layout.sources_dir.display());
    println!("  Includes dir: {}", layout.includes_dir.display());

    Ok(())
}

/// Show basic information about an existing project.
pub fn project_info_command(root: &str, json: bool) -> Result<()> {
    let ctx = open_project(root)?;
    let layout = &ctx.layout;
    let config = &ctx.config;

    let descriptor_text = match fs::read_to_string(&layout.descriptor_path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read build descriptor {}", layout.descriptor_path.display())
            })
        }
    };
    let regions = descriptor_text
        .as_deref()
        .map(|text| DescriptorDocument::parse(text).regions())
        .unwrap_or_default();

    let mut unsupported = Vec::new();
    for chipset in Chipset::ALL {
        let items = ctx.workspace.unsupported_on(chipset)?;
        if !items.is_empty() {
            unsupported.push(ChipsetSupport { chipset, items });
        }
    }
    let default_elf = layout.default_elf_path(&config.name, config.chipset, config.build_mode);

    if json {
        let snapshot = ProjectInfoSnapshot {
            name: config.name.clone(),
            root: layout.root.display().to_string(),
            config_file: layout.project_config_path.display().to_string(),
            config_version: config.config_version.clone(),
            chipset: config.chipset,
            build_mode: config.build_mode,
            descriptor: DescriptorInfo {
                path: layout.descriptor_path.display().to_string(),
                exists: descriptor_text.is_some(),
                regions,
            },
            default_elf: default_elf.display().to_string(),
            selection: config.selection.clone(),
            unsupported,
            layout: ProjectInfoLayout {
                meta_dir: layout.meta_dir.display().to_string(),
                sources_dir: layout.sources_dir.display().to_string(),
                includes_dir: layout.includes_dir.display().to_string(),
            },
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("FT9xx project info:");
    println!("  Name: {}", config.name);
    if let Some(description) = &config.description {
        println!("  Description: {}", description);
    }
    println!("  Root: {}", layout.root.display());
    println!("  Config file: {}", layout.project_config_path.display());
    println!("  Config version: {}", config.config_version);
    println!("  Chipset: {}", config.chipset);
    println!("  Build mode: {}", config.build_mode);
    println!("  Default image: {}", default_elf.display());

    println!();
    println!("Layout:");
    print_dir_status("Meta dir", &layout.meta_dir);
    print_dir_status("Sources dir", &layout.sources_dir);
    print_dir_status("Includes dir", &layout.includes_dir);

    println!();
    match &descriptor_text {
        Some(_) => {
            println!("Descriptor: {}", layout.descriptor_path.display());
            for region in Region::ALL {
                let found = regions.contains(&region);
                println!("  - {region}: {}", if found { "OK" } else { "MISSING MARKERS" });
            }
        }
        None => println!("Descriptor: MISSING ({})", layout.descriptor_path.display()),
    }

    let selection = &config.selection;
    println!();
    println!("Selection:");
    print_names("Hardware libraries", selection.hardware_libs.iter());
    print_names("Third-party libraries", selection.third_party_libs.iter());
    print_names("Layered drivers", selection.layered_drivers.iter());
    println!("  Pre-built libraries: {}", selection.prebuilt_kind);
    print_names("Custom definitions", selection.custom_definitions.iter());
    print_names("Custom linker flags", selection.custom_linker_flags.iter());

    if !unsupported.is_empty() {
        println!();
        for entry in &unsupported {
            println!("Not supported on {}: {}", entry.chipset, format_unsupported(&entry.items));
        }
    }

    Ok(())
}

fn print_names<'a>(label: &str, names: impl Iterator<Item = &'a String>) {
    let names: Vec<&str> = names.map(String::as_str).collect();
    if names.is_empty() {
        println!("  {label}: (none)");
    } else {
        println!("  {label}: {}", names.join(", "));
    }
}

/// Switch between Debug and Release; this moves the default image path.
pub fn set_build_mode_command(root: &str, mode: &str) -> Result<()> {
    let mode: BuildMode = mode.parse().map_err(anyhow::Error::msg)?;
    let mut ctx = open_project(root)?;
    ctx.config.build_mode = mode;
    save_project_config(&ctx.layout, &ctx.config)?;

    let elf = ctx.layout.default_elf_path(&ctx.config.name, ctx.config.chipset, mode);
    println!("Build mode: {mode}");
    println!("Default image: {}", elf.display());
    Ok(())
}
