use std::path::Path;

use ft9xx::commands::*;
use ft9xx_core::catalog::{CatalogKind, Chipset};
use ft9xx_core::project::{load_project_config, BuildMode, ProjectLayout};
use ft9xx_core::selection::UnsupportedItem;
use ft9xx_core::services::workspace::DocumentStatus;
use tempfile::tempdir;

fn init(root: &Path) -> String {
    let root_str = root.to_str().unwrap().to_string();
    init_project_command(&root_str, Some("unit".into()), Some("FT93x")).expect("init");
    root_str
}

#[test]
fn init_project_writes_config_with_requested_chipset() {
    let dir = tempdir().unwrap();
    let root = init(dir.path());

    let config = load_project_config(&ProjectLayout::new(&root)).unwrap();
    assert_eq!(config.name, "unit");
    assert_eq!(config.chipset, Chipset::Ft93x);
    assert!(init_project_command(&root, None, None).is_err());
}

#[test]
fn init_project_rejects_unknown_chipset() {
    let dir = tempdir().unwrap();
    let root = dir.path().to_str().unwrap();
    let err = init_project_command(root, None, Some("FT81x")).unwrap_err();
    assert!(err.to_string().contains("Unknown chipset"));
    assert!(!ProjectLayout::new(root).project_config_path.exists());
}

#[test]
fn add_unsupported_library_warns_but_succeeds() {
    let dir = tempdir().unwrap();
    let root = init(dir.path());

    // CAN is FT90x-only; the project targets FT93x.
    add_library_command(&root, CatalogKind::HardwareLibrary, "CAN Driver").expect("add");
    assert!(check_chipset_command(&root, "FT93x", false).is_err());
    assert!(check_chipset_command(&root, "FT90x", true).is_ok());
    assert!(set_chipset_command(&root, "FT90x").is_ok());
}

#[test]
fn remove_unselected_library_is_a_noop() {
    let dir = tempdir().unwrap();
    let root = init(dir.path());
    let layout = ProjectLayout::new(&root);
    let before = std::fs::read_to_string(&layout.descriptor_path).unwrap();

    remove_library_command(&root, CatalogKind::ThirdPartyLibrary, "lwIP").expect("remove");
    assert_eq!(std::fs::read_to_string(&layout.descriptor_path).unwrap(), before);
}

#[test]
fn set_build_mode_moves_default_image() {
    let dir = tempdir().unwrap();
    let root = init(dir.path());

    set_build_mode_command(&root, "release").expect("release");
    let config = load_project_config(&ProjectLayout::new(&root)).unwrap();
    assert_eq!(config.build_mode, BuildMode::Release);

    assert!(set_build_mode_command(&root, "profile").is_err());
}

#[test]
fn project_info_runs_in_both_modes() {
    let dir = tempdir().unwrap();
    let root = init(dir.path());
    project_info_command(&root, false).expect("text");
    project_info_command(&root, true).expect("json");

    std::fs::remove_file(ProjectLayout::new(&root).descriptor_path).unwrap();
    project_info_command(&root, false).expect("text without descriptor");
}

#[test]
fn mutations_without_descriptor_still_persist_selection() {
    let dir = tempdir().unwrap();
    let root = init(dir.path());
    let layout = ProjectLayout::new(&root);
    std::fs::remove_file(&layout.descriptor_path).unwrap();

    set_prebuilt_command(&root, "d2xx").expect("prebuilt");
    set_custom_definitions_command(&root, vec!["-DX".into()]).expect("defs");
    set_custom_linker_flags_command(&root, vec![]).expect("flags");

    assert!(!layout.descriptor_path.exists());
    let config = load_project_config(&layout).unwrap();
    assert_eq!(config.selection.prebuilt_kind.as_str(), "d2xx");
    assert_eq!(config.selection.custom_definitions, vec!["-DX"]);

    regenerate_command(&root).expect("regenerate");
    let text = std::fs::read_to_string(&layout.descriptor_path).unwrap();
    assert!(text.contains("ft930_d2xx_dev\n"));
    assert!(text.contains("    -DX\n"));
}

#[test]
fn catalog_listing_filters_tables() {
    let all = CatalogListing::new(None);
    assert!(all.hardware_libraries.is_some());
    assert!(all.third_party_libraries.is_some());
    assert!(all.layered_drivers.is_some());

    let drivers = CatalogListing::new(Some(CatalogKind::LayeredDriver));
    assert!(drivers.hardware_libraries.is_none());
    assert_eq!(drivers.layered_drivers.unwrap().len(), 6);

    list_catalog_command(None, false).expect("text");
    list_catalog_command(Some(CatalogKind::HardwareLibrary), true).expect("json");
}

#[test]
fn resolve_image_target_requires_elf_or_project() {
    let dir = tempdir().unwrap();
    let root = dir.path().to_str().unwrap();
    let err = resolve_image_target(root, None).unwrap_err();
    assert!(err.to_string().contains("No --elf given"));

    let root = init(dir.path());
    let target = resolve_image_target(&root, None).unwrap();
    assert!(target.elf.ends_with("FT93x_Debug/unit.elf"));
}

#[test]
fn describe_document_status_wording() {
    let path = Path::new("CMakeLists.txt");
    assert!(describe_document_status(DocumentStatus::Missing, path).contains("not found"));
    assert!(describe_document_status(DocumentStatus::Unchanged, path).contains("up to date"));
    assert!(describe_document_status(DocumentStatus::Rewritten, path).contains("updated"));
}

#[test]
fn format_unsupported_joins_items() {
    let items = vec![
        UnsupportedItem { kind: CatalogKind::HardwareLibrary, name: "CAN Driver".into() },
        UnsupportedItem { kind: CatalogKind::HardwareLibrary, name: "I2S Driver".into() },
    ];
    assert_eq!(
        format_unsupported(&items),
        "CAN Driver (hardware library), I2S Driver (hardware library)"
    );
    assert_eq!(format_unsupported(&[]), "");
}

#[test]
fn print_dir_status_handles_missing_dir() {
    let dir = tempdir().unwrap();
    print_dir_status("Existing", dir.path());
    print_dir_status("Missing", &dir.path().join("nope"));
}
