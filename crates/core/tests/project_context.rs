use ft9xx_core::catalog::Chipset;
use ft9xx_core::descriptor::seed_document;
use std::thread;
use std::time::Duration;

use ft9xx_core::project::{
    load_project_config, save_project_config, BuildMode, ProjectConfig, ProjectContext,
    ProjectLayout, ProjectLock,
};
use ft9xx_core::selection::PrebuiltKind;
use ft9xx_core::services::workspace::DocumentStatus;

fn write_project(root: &std::path::Path, config: &ProjectConfig) -> ProjectLayout {
    let layout = ProjectLayout::new(root);
    std::fs::create_dir_all(&layout.meta_dir).unwrap();
    save_project_config(&layout, config).unwrap();
    layout
}

#[test]
fn layout_paths_are_derived_from_root() {
    let layout = ProjectLayout::new("/work/blinky");
    assert!(layout.project_config_path.ends_with(".ft9xx/project.json"));
    assert!(layout.descriptor_path.ends_with("CMakeLists.txt"));
    assert!(layout.sources_dir.ends_with("Sources"));
    assert!(layout.includes_dir.ends_with("Includes"));

    let elf = layout.default_elf_path("blinky", Chipset::Ft93x, BuildMode::Release);
    assert!(elf.ends_with("FT93x_Release/blinky.elf"));
}

#[test]
fn project_context_loads_config_and_binds_descriptor() {
    let temp = tempfile::tempdir().unwrap();
    let config = ProjectConfig::new("CtxProject", Chipset::Ft90x);
    let layout = write_project(temp.path(), &config);
    std::fs::write(&layout.descriptor_path, seed_document("CtxProject")).unwrap();

    let mut ctx = ProjectContext::from_root(temp.path()).expect("context");
    assert_eq!(ctx.config.name, "CtxProject");
    assert_eq!(ctx.config.build_mode, BuildMode::Debug);

    let outcome = ctx.workspace.add_hardware_library("SPI Driver").unwrap();
    assert_eq!(outcome.document, DocumentStatus::Rewritten);
    let text = std::fs::read_to_string(&layout.descriptor_path).unwrap();
    assert!(text.contains("hw/src/*.c"));

    ctx.workspace.set_prebuilt_kind(PrebuiltKind::D2xx).unwrap();
    ctx.persist_selection().unwrap();

    let reloaded = load_project_config(&layout).unwrap();
    assert!(reloaded.selection.hardware_libs.contains("SPI Driver"));
    assert_eq!(reloaded.selection.prebuilt_kind, PrebuiltKind::D2xx);

    // A fresh context starts from the persisted selection.
    let ctx = ProjectContext::from_root(temp.path()).unwrap();
    assert_eq!(ctx.workspace.regenerate().unwrap().document, DocumentStatus::Unchanged);
}

#[test]
fn missing_config_is_a_readable_error() {
    let temp = tempfile::tempdir().unwrap();
    let err = ProjectContext::from_root(temp.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read project config"));
}

#[test]
fn malformed_config_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(temp.path());
    std::fs::create_dir_all(&layout.meta_dir).unwrap();
    std::fs::write(&layout.project_config_path, "{ not json").unwrap();

    let err = load_project_config(&layout).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse project config JSON"));
}

#[test]
fn config_defaults_fill_missing_sections() {
    let temp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(temp.path());
    std::fs::create_dir_all(&layout.meta_dir).unwrap();
    std::fs::write(
        &layout.project_config_path,
        r#"{"name":"old","config_version":"0.1.0","chipset":"FT93x"}"#,
    )
    .unwrap();

    let config = load_project_config(&layout).unwrap();
    assert_eq!(config.chipset, Chipset::Ft93x);
    assert_eq!(config.build_mode, BuildMode::Debug);
    assert!(config.toolchain.size.is_none());
    assert!(config.selection.hardware_libs.is_empty());
}

#[test]
fn build_mode_parses_case_insensitively() {
    assert_eq!("release".parse::<BuildMode>().unwrap(), BuildMode::Release);
    assert_eq!("Debug".parse::<BuildMode>().unwrap(), BuildMode::Debug);
    assert!("profile".parse::<BuildMode>().is_err());
}

#[test]
fn project_lock_is_exclusive_until_dropped() {
    let temp = tempfile::tempdir().unwrap();
    let layout = write_project(temp.path(), &ProjectConfig::new("locked", Chipset::Ft90x));

    let held = ProjectLock::acquire(&layout).unwrap();
    assert!(layout.lock_path.exists());
    let err = ProjectLock::acquire_with_wait(&layout, Duration::ZERO).unwrap_err();
    assert!(err.to_string().contains("locked by another ft9xx process"));

    drop(held);
    assert!(!layout.lock_path.exists());
    ProjectLock::acquire_with_wait(&layout, Duration::ZERO).expect("lock after release");
}

#[test]
fn locked_context_holds_the_lock_for_its_lifetime() {
    let temp = tempfile::tempdir().unwrap();
    let layout = write_project(temp.path(), &ProjectConfig::new("locked", Chipset::Ft90x));

    let ctx = ProjectContext::open_locked(temp.path()).unwrap();
    assert!(ctx.is_locked());
    assert!(ProjectLock::acquire_with_wait(&layout, Duration::ZERO).is_err());
    drop(ctx);

    assert!(!ProjectContext::from_root(temp.path()).unwrap().is_locked());
    assert!(!layout.lock_path.exists());
}

#[test]
fn overlapping_locked_edits_do_not_lose_updates() {
    let temp = tempfile::tempdir().unwrap();
    let layout = write_project(temp.path(), &ProjectConfig::new("shared", Chipset::Ft90x));
    std::fs::write(&layout.descriptor_path, seed_document("shared")).unwrap();

    let names = ["UART Driver", "SPI Driver", "GPIO Driver", "Ethernet Driver"];
    let handles: Vec<_> = names
        .iter()
        .map(|&name| {
            let root = temp.path().to_path_buf();
            thread::spawn(move || {
                let mut ctx = ProjectContext::open_locked(&root).unwrap();
                ctx.workspace.add_hardware_library(name).unwrap();
                ctx.persist_selection().unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let config = load_project_config(&layout).unwrap();
    for name in names {
        assert!(config.selection.hardware_libs.contains(name), "lost {name}");
    }
    assert!(!layout.lock_path.exists());
}

#[test]
fn saves_leave_no_temp_files_behind() {
    let temp = tempfile::tempdir().unwrap();
    let layout = write_project(temp.path(), &ProjectConfig::new("tidy", Chipset::Ft90x));
    std::fs::write(&layout.descriptor_path, seed_document("tidy")).unwrap();

    let mut ctx = ProjectContext::open_locked(temp.path()).unwrap();
    ctx.workspace.add_hardware_library("GPIO Driver").unwrap();
    ctx.persist_selection().unwrap();
    drop(ctx);

    assert!(std::fs::read_to_string(&layout.descriptor_path).unwrap().contains("hw/src/*.c"));
    assert!(!temp.path().join(".CMakeLists.txt.tmp").exists());
    assert!(!layout.meta_dir.join(".project.json.tmp").exists());
}
