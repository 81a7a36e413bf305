use anyhow::Result;
use ft9xx_core::catalog::{
    CatalogEntry, CatalogKind, Chipset, HardwareLibraryInfo, LayeredDriverInfo,
    ThirdPartyLibraryInfo, HARDWARE_LIBRARIES, LAYERED_DRIVERS, THIRD_PARTY_LIBRARIES,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct CatalogListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_libraries: Option<&'static [HardwareLibraryInfo]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_party_libraries: Option<&'static [ThirdPartyLibraryInfo]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layered_drivers: Option<&'static [LayeredDriverInfo]>,
}

impl CatalogListing {
    /// The whole catalog, or only the table for `kind`.
    pub fn new(kind: Option<CatalogKind>) -> Self {
        let wants = |k: CatalogKind| kind.map_or(true, |selected| selected == k);
        Self {
            hardware_libraries: wants(CatalogKind::HardwareLibrary).then_some(HARDWARE_LIBRARIES),
            third_party_libraries: wants(CatalogKind::ThirdPartyLibrary)
                .then_some(THIRD_PARTY_LIBRARIES),
            layered_drivers: wants(CatalogKind::LayeredDriver).then_some(LAYERED_DRIVERS),
        }
    }
}

/// List the built-in library catalog.
pub fn list_catalog_command(kind: Option<CatalogKind>, json: bool) -> Result<()> {
    let listing = CatalogListing::new(kind);
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if let Some(entries) = listing.hardware_libraries {
        print_table("Hardware libraries", entries);
    }
    if let Some(entries) = listing.third_party_libraries {
        print_table("Third-party libraries", entries);
    }
    if let Some(entries) = listing.layered_drivers {
        print_table("Layered drivers", entries);
    }
    Ok(())
}

fn print_table<E: CatalogEntry>(title: &str, entries: &[E]) {
    println!("{title} ({}):", entries.len());
    for entry in entries {
        let chipsets: Vec<&str> = entry.supported_chipsets().iter().map(|c| c.as_str()).collect();
        let note = if entry.supported_chipsets().len() == Chipset::ALL.len() {
            String::new()
        } else {
            format!("  [{} only]", chipsets.join(", "))
        };
        println!("  - {}{note}", entry.name());
    }
}
