use std::fs;
use std::path::Path;

use ft9xx::commands::{default_project_name, image_sha256, resolve_path};
use tempfile::tempdir;

#[test]
fn resolve_path_returns_cwd_for_dot() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = resolve_path(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");
    assert_eq!(result, expected);

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn resolve_path_keeps_not_yet_existing_paths() {
    let result = resolve_path("definitely/not/here").expect("canonicalize");
    assert!(result.is_absolute());
    assert!(result.ends_with("definitely/not/here"));
}

#[test]
fn default_project_name_uses_last_path_component() {
    assert_eq!(default_project_name(Path::new("C:/work/blinky")), "blinky");
    assert_eq!(default_project_name(Path::new("/tmp/usb-hid-demo")), "usb-hid-demo");
}

#[test]
fn default_project_name_replaces_characters_cmake_rejects() {
    assert_eq!(default_project_name(Path::new("/work/my blinky (v2)")), "my_blinky__v2_");
    assert_eq!(default_project_name(Path::new("/work/fw_1.0")), "fw_1.0");
}

#[test]
fn default_project_name_falls_back_when_missing() {
    assert_eq!(default_project_name(Path::new("/")), "ft9xx-project");
}

#[test]
fn image_sha256_hashes_contents() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("image.elf");
    fs::write(&path, b"abc").expect("write");
    assert_eq!(
        image_sha256(&path).expect("hash"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert!(image_sha256(&tmp.path().join("missing.elf")).is_err());
}
