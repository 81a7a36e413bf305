use std::sync::Arc;
use std::thread;

use ft9xx_core::catalog::Chipset;
use ft9xx_core::descriptor::DEFAULT_TEMPLATE;
use ft9xx_core::selection::{PrebuiltKind, SelectionError, SelectionState};
use ft9xx_core::services::workspace::{
    DescriptorStore, DocumentStatus, FileDescriptorStore, MemoryDescriptorStore, WorkspaceContext,
    WorkspaceError, WorkspaceId,
};

/// Store handle shared between the test and the workspace.
#[derive(Clone, Default)]
struct SharedStore(Arc<MemoryDescriptorStore>);

impl SharedStore {
    fn with(text: &str) -> Self {
        Self(Arc::new(MemoryDescriptorStore::new(Some(text.to_string()))))
    }

    fn text(&self) -> Option<String> {
        self.0.contents()
    }
}

impl DescriptorStore for SharedStore {
    fn load(&self) -> std::io::Result<Option<String>> {
        self.0.load()
    }

    fn save(&self, text: &str) -> std::io::Result<()> {
        self.0.save(text)
    }
}

fn workspace(store: SharedStore) -> WorkspaceContext {
    WorkspaceContext::new(WorkspaceId::new("/work/blinky"), SelectionState::default(), store)
}

#[test]
fn add_rewrites_descriptor_and_repeat_is_unchanged() {
    let store = SharedStore::with(DEFAULT_TEMPLATE);
    let ws = workspace(store.clone());

    let outcome = ws.add_hardware_library("GPIO Driver").unwrap();
    assert_eq!(outcome.document, DocumentStatus::Rewritten);
    assert!(outcome.inputs.includes_hardware_libs);
    let after_first = store.text().unwrap();
    assert!(after_first.contains("    hw/src/*.c\n"));
    assert!(after_first.contains("    hw/include\n"));

    let outcome = ws.add_hardware_library("GPIO Driver").unwrap();
    assert_eq!(outcome.document, DocumentStatus::Unchanged);
    assert_eq!(store.text().unwrap(), after_first);
}

#[test]
fn not_found_leaves_selection_and_document_alone() {
    let store = SharedStore::with(DEFAULT_TEMPLATE);
    let ws = workspace(store.clone());
    ws.add_third_party_library("FatFs").unwrap();
    let before = store.text().unwrap();

    let err = ws.add_layered_driver("USB Host MIDI").unwrap_err();
    assert!(matches!(err, WorkspaceError::Selection(_)));
    assert_eq!(err.to_string(), "layered driver 'USB Host MIDI' not found");
    assert_eq!(store.text().unwrap(), before);
    assert!(ws.selection().unwrap().layered_drivers.is_empty());
}

#[test]
fn missing_document_updates_state_only() {
    let store = SharedStore::default();
    let ws = workspace(store.clone());

    let outcome = ws.set_prebuilt_kind(PrebuiltKind::D2xx).unwrap();
    assert_eq!(outcome.document, DocumentStatus::Missing);
    assert_eq!(ws.inputs().unwrap().prebuilt_kind, PrebuiltKind::D2xx);
    assert_eq!(store.text(), None);
}

#[test]
fn regenerate_repairs_hand_edited_regions() {
    let store = SharedStore::with(DEFAULT_TEMPLATE);
    let ws = workspace(store.clone());
    ws.add_hardware_library("UART Driver").unwrap();
    let good = store.text().unwrap();

    let damaged = good.replace("    hw/src/*.c\n", "    hand/edited/*.c\n");
    store.save(&damaged).unwrap();

    let outcome = ws.regenerate().unwrap();
    assert_eq!(outcome.document, DocumentStatus::Rewritten);
    assert_eq!(store.text().unwrap(), good);
}

#[test]
fn remove_and_custom_setters_flow_into_document() {
    let store = SharedStore::with(DEFAULT_TEMPLATE);
    let ws = workspace(store.clone());
    ws.add_third_party_library("tinyprintf").unwrap();
    ws.set_custom_definitions(vec!["-DTINYPRINTF_DEFINE_TFP_PRINTF=1".into()]).unwrap();
    ws.set_custom_linker_flags(vec!["-Wl,--print-memory-usage".into()]).unwrap();

    let text = store.text().unwrap();
    assert!(text.contains("    libs/thirdPartyLibs/tinyprintf/*.c\n"));
    assert!(text.contains("    -DTINYPRINTF_DEFINE_TFP_PRINTF=1\n"));
    assert!(text.contains("    -Wl,--print-memory-usage\n"));

    ws.remove_third_party_library("tinyprintf").unwrap();
    ws.set_custom_definitions(Vec::new()).unwrap();
    ws.set_custom_linker_flags(Vec::new()).unwrap();
    assert_eq!(store.text().unwrap(), DEFAULT_TEMPLATE);
}

#[test]
fn marker_like_custom_entry_is_rejected_before_synthesis() {
    let store = SharedStore::with(DEFAULT_TEMPLATE);
    let ws = workspace(store.clone());

    let err = ws
        .set_custom_definitions(vec!["-DX # GENERATED: CUSTOM DEFINITIONS - DO NOT MODIFY - END".into()])
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::Selection(SelectionError::InvalidVerbatim { .. })));
    assert!(ws.selection().unwrap().custom_definitions.is_empty());
    assert_eq!(store.text().unwrap(), DEFAULT_TEMPLATE);
}

#[test]
fn chipset_queries_reflect_selection() {
    let ws = workspace(SharedStore::default());
    ws.add_hardware_library("Ethernet Driver").unwrap();
    assert!(ws.is_selection_supported_on(Chipset::Ft90x).unwrap());
    assert!(!ws.is_selection_supported_on(Chipset::Ft93x).unwrap());
    assert_eq!(ws.unsupported_on(Chipset::Ft93x).unwrap()[0].name, "Ethernet Driver");

    ws.remove_hardware_library("Ethernet Driver").unwrap();
    assert!(ws.is_selection_supported_on(Chipset::Ft93x).unwrap());
}

#[test]
fn concurrent_mutations_all_land() {
    let store = SharedStore::with(DEFAULT_TEMPLATE);
    let ws = Arc::new(workspace(store.clone()));
    let names = ["ADC Driver", "GPIO Driver", "SPI Driver", "RTC Driver"];

    let handles: Vec<_> = names
        .iter()
        .map(|&name| {
            let ws = Arc::clone(&ws);
            thread::spawn(move || ws.add_hardware_library(name).map(|_| ()))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(ws.selection().unwrap().hardware_libs.len(), names.len());
    // Same text as a single-threaded run would produce.
    let text = store.text().unwrap();
    assert_eq!(text.matches("hw/src/*.c").count(), 1);
    assert_eq!(ws.regenerate().unwrap().document, DocumentStatus::Unchanged);
}

#[test]
fn file_store_treats_missing_file_as_no_document() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("CMakeLists.txt");
    let store = FileDescriptorStore::new(&path);
    assert_eq!(store.load().unwrap(), None);

    store.save("cmake_minimum_required(VERSION 3.13)\n").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("cmake_minimum_required(VERSION 3.13)\n"));
    assert_eq!(store.path(), path.as_path());
}
