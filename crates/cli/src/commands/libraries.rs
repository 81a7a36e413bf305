use anyhow::{bail, Result};
use ft9xx_core::catalog::CatalogKind;
use ft9xx_core::project::save_project_config;
use ft9xx_core::selection::PrebuiltKind;
use serde::Serialize;

use crate::commands::{
    format_unsupported, open_project, parse_chipset, print_outcome, seed_descriptor_if_missing,
};

/// Add a catalog item to the project's selection and regenerate the descriptor.
pub fn add_library_command(root: &str, kind: CatalogKind, name: &str) -> Result<()> {
    let mut ctx = open_project(root)?;
    let outcome = match kind {
        CatalogKind::HardwareLibrary => ctx.workspace.add_hardware_library(name)?,
        CatalogKind::ThirdPartyLibrary => ctx.workspace.add_third_party_library(name)?,
        CatalogKind::LayeredDriver => ctx.workspace.add_layered_driver(name)?,
    };
    ctx.persist_selection()?;

    println!("Added {kind} '{name}'.");
    print_outcome(&outcome, &ctx.layout);

    let chipset = ctx.config.chipset;
    let unsupported = ctx.workspace.unsupported_on(chipset)?;
    if !unsupported.is_empty() {
        println!("Warning: not supported on {chipset}: {}", format_unsupported(&unsupported));
    }
    Ok(())
}

/// Remove a catalog item from the selection. Removing an unselected name is a no-op.
pub fn remove_library_command(root: &str, kind: CatalogKind, name: &str) -> Result<()> {
    let mut ctx = open_project(root)?;
    let was_selected = match kind {
        CatalogKind::HardwareLibrary => ctx.config.selection.hardware_libs.contains(name),
        CatalogKind::ThirdPartyLibrary => ctx.config.selection.third_party_libs.contains(name),
        CatalogKind::LayeredDriver => ctx.config.selection.layered_drivers.contains(name),
    };
    let outcome = match kind {
        CatalogKind::HardwareLibrary => ctx.workspace.remove_hardware_library(name)?,
        CatalogKind::ThirdPartyLibrary => ctx.workspace.remove_third_party_library(name)?,
        CatalogKind::LayeredDriver => ctx.workspace.remove_layered_driver(name)?,
    };
    ctx.persist_selection()?;

    if was_selected {
        println!("Removed {kind} '{name}'.");
    } else {
        println!("{kind} '{name}' was not selected.");
    }
    print_outcome(&outcome, &ctx.layout);
    Ok(())
}

/// Choose the pre-built D2XX library variant (`none`, `d2xx`, `d2xx_rtos`).
pub fn set_prebuilt_command(root: &str, kind: &str) -> Result<()> {
    let kind: PrebuiltKind = kind.parse()?;
    let mut ctx = open_project(root)?;
    let outcome = ctx.workspace.set_prebuilt_kind(kind)?;
    ctx.persist_selection()?;

    println!("Pre-built libraries: {kind}");
    print_outcome(&outcome, &ctx.layout);
    Ok(())
}

/// Replace the custom compiler definitions with `definitions`, verbatim.
pub fn set_custom_definitions_command(root: &str, definitions: Vec<String>) -> Result<()> {
    let mut ctx = open_project(root)?;
    let count = definitions.len();
    let outcome = ctx.workspace.set_custom_definitions(definitions)?;
    ctx.persist_selection()?;

    println!("Custom definitions: {count}");
    print_outcome(&outcome, &ctx.layout);
    Ok(())
}

/// Replace the custom linker flags with `flags`, verbatim.
pub fn set_custom_linker_flags_command(root: &str, flags: Vec<String>) -> Result<()> {
    let mut ctx = open_project(root)?;
    let count = flags.len();
    let outcome = ctx.workspace.set_custom_linker_flags(flags)?;
    ctx.persist_selection()?;

    println!("Custom linker flags: {count}");
    print_outcome(&outcome, &ctx.layout);
    Ok(())
}

/// Re-render every generated region from the saved selection.
///
/// A missing descriptor is recreated from the default template first.
pub fn regenerate_command(root: &str) -> Result<()> {
    let ctx = open_project(root)?;
    if seed_descriptor_if_missing(&ctx.layout, &ctx.config)? {
        println!("Created default build descriptor: {}", ctx.layout.descriptor_path.display());
    }
    let outcome = ctx.workspace.regenerate()?;
    print_outcome(&outcome, &ctx.layout);
    Ok(())
}

#[derive(Serialize)]
pub struct ChipsetCheckReport {
    pub chipset: String,
    pub supported: bool,
    pub unsupported: Vec<ft9xx_core::selection::UnsupportedItem>,
}

/// Report whether the current selection builds for `chipset`.
///
/// Fails (non-zero exit) when it does not, listing the offending items.
pub fn check_chipset_command(root: &str, chipset: &str, json: bool) -> Result<()> {
    let chipset = parse_chipset(chipset)?;
    let ctx = open_project(root)?;
    let unsupported = ctx.workspace.unsupported_on(chipset)?;

    if json {
        let report = ChipsetCheckReport {
            chipset: chipset.to_string(),
            supported: unsupported.is_empty(),
            unsupported: unsupported.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if unsupported.is_empty() {
        println!("Selection is supported on {chipset}.");
    }

    if !unsupported.is_empty() {
        bail!("Selection is not supported on {chipset}: {}", format_unsupported(&unsupported));
    }
    Ok(())
}

/// Switch the project to `chipset`, refusing if the selection cannot build for it.
pub fn set_chipset_command(root: &str, chipset: &str) -> Result<()> {
    let chipset = parse_chipset(chipset)?;
    let mut ctx = open_project(root)?;
    let unsupported = ctx.workspace.unsupported_on(chipset)?;
    if !unsupported.is_empty() {
        bail!(
            "Cannot switch to {chipset}; remove these first: {}",
            format_unsupported(&unsupported)
        );
    }

    let previous = ctx.config.chipset;
    ctx.config.chipset = chipset;
    save_project_config(&ctx.layout, &ctx.config)?;
    println!("Chipset: {previous} -> {chipset}");
    Ok(())
}
