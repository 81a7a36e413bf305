//! Library/driver selection state and its normalized build inputs.
//!
//! `SelectionState` is what gets persisted per project. `AggregateBuildInputs`
//! is derived from it (plus the static catalogs) and is what the descriptor
//! synthesizer renders. The aggregate is always recomputed from the whole
//! selection, never patched.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{self, CatalogEntry, CatalogKind, Chipset, DriverRoot};
use crate::descriptor::is_verbatim_safe;

/// Which precompiled D2XX communications library the project links against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrebuiltKind {
    #[default]
    None,
    D2xx,
    D2xxRtos,
}

impl PrebuiltKind {
    /// Suffix appended to `<chip prefix>_d2xx_`; `None` has no target.
    pub fn target_suffix(self) -> Option<&'static str> {
        match self {
            PrebuiltKind::None => None,
            PrebuiltKind::D2xx => Some("dev"),
            PrebuiltKind::D2xxRtos => Some("dev_rtos"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrebuiltKind::None => "none",
            PrebuiltKind::D2xx => "d2xx",
            PrebuiltKind::D2xxRtos => "d2xx_rtos",
        }
    }
}

impl fmt::Display for PrebuiltKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid prebuilt library kind '{0}'. Allowed: none, d2xx, d2xx_rtos")]
pub struct InvalidPrebuiltKind(pub String);

impl FromStr for PrebuiltKind {
    type Err = InvalidPrebuiltKind;

    /// Accepts the settings spellings (`""`, `d2xx`, `d2xx_rtos`) plus `none`
    /// and the kebab-case CLI spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(PrebuiltKind::None),
            "d2xx" => Ok(PrebuiltKind::D2xx),
            "d2xx_rtos" | "d2xx-rtos" => Ok(PrebuiltKind::D2xxRtos),
            other => Err(InvalidPrebuiltKind(other.to_string())),
        }
    }
}

/// Persisted selection for one project.
///
/// Name sets are `BTreeSet`s so two set-equal selections serialize and
/// aggregate identically regardless of the order items were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default)]
    pub hardware_libs: BTreeSet<String>,
    #[serde(default)]
    pub third_party_libs: BTreeSet<String>,
    #[serde(default)]
    pub layered_drivers: BTreeSet<String>,
    #[serde(default)]
    pub prebuilt_kind: PrebuiltKind,
    #[serde(default)]
    pub custom_definitions: Vec<String>,
    #[serde(default)]
    pub custom_linker_flags: Vec<String>,
}

/// Union of the selected third-party libraries' catalog records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPartyAggregate {
    pub source_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub include_paths: Vec<String>,
    pub definitions: Vec<String>,
}

/// Everything the descriptor synthesizer needs, and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateBuildInputs {
    pub includes_hardware_libs: bool,
    pub includes_usb_libs: bool,
    pub includes_driver_libs: bool,
    pub prebuilt_kind: PrebuiltKind,
    pub third_party: ThirdPartyAggregate,
    pub custom_definitions: Vec<String>,
    pub custom_linker_flags: Vec<String>,
}

impl AggregateBuildInputs {
    /// Compute the aggregate for `selection`.
    ///
    /// Names missing from the catalogs (e.g. from a hand-edited config) are
    /// ignored here; the aggregator rejects them before they get this far.
    pub fn from_selection(selection: &SelectionState) -> Self {
        let drivers: Vec<_> =
            selection.layered_drivers.iter().filter_map(|n| catalog::layered_driver(n)).collect();

        let mut third_party = ThirdPartyAggregate::default();
        // Catalog order, not selection order, keeps output stable and readable.
        let selected = catalog::THIRD_PARTY_LIBRARIES
            .iter()
            .filter(|lib| selection.third_party_libs.contains(lib.name));
        let mut seen: [HashSet<&str>; 4] = Default::default();
        for lib in selected {
            union_into(&mut third_party.source_paths, &mut seen[0], lib.source_paths);
            union_into(&mut third_party.exclude_paths, &mut seen[1], lib.exclude_paths);
            union_into(&mut third_party.include_paths, &mut seen[2], lib.include_paths);
            union_into(&mut third_party.definitions, &mut seen[3], lib.definitions);
        }

        Self {
            includes_hardware_libs: !selection.hardware_libs.is_empty(),
            includes_usb_libs: drivers.iter().any(|d| d.root == DriverRoot::Usb),
            includes_driver_libs: drivers.iter().any(|d| d.root == DriverRoot::Drivers),
            prebuilt_kind: selection.prebuilt_kind,
            third_party,
            custom_definitions: selection.custom_definitions.clone(),
            custom_linker_flags: selection.custom_linker_flags.clone(),
        }
    }
}

fn union_into<'a>(out: &mut Vec<String>, seen: &mut HashSet<&'a str>, items: &'a [&'a str]) {
    for item in items {
        if seen.insert(item) {
            out.push((*item).to_string());
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: CatalogKind, name: String },
    /// Verbatim entries must stay on one line and must not look like a
    /// generated-region marker.
    #[error("Invalid {field} entry {value:?}: line breaks and '# GENERATED:' are not allowed")]
    InvalidVerbatim { field: &'static str, value: String },
}

/// A selected item that cannot be built for some chipset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedItem {
    pub kind: CatalogKind,
    pub name: String,
}

/// Owns one project's selection and keeps its aggregate current.
#[derive(Debug, Clone, Default)]
pub struct LibrarySelectionAggregator {
    selection: SelectionState,
    inputs: AggregateBuildInputs,
}

impl LibrarySelectionAggregator {
    pub fn new(selection: SelectionState) -> Self {
        let inputs = AggregateBuildInputs::from_selection(&selection);
        Self { selection, inputs }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn inputs(&self) -> &AggregateBuildInputs {
        &self.inputs
    }

    pub fn add_hardware_library(&mut self, name: &str) -> Result<bool, SelectionError> {
        ensure_known(CatalogKind::HardwareLibrary, name)?;
        let added = self.selection.hardware_libs.insert(name.to_string());
        self.recompute();
        Ok(added)
    }

    pub fn add_third_party_library(&mut self, name: &str) -> Result<bool, SelectionError> {
        ensure_known(CatalogKind::ThirdPartyLibrary, name)?;
        let added = self.selection.third_party_libs.insert(name.to_string());
        self.recompute();
        Ok(added)
    }

    pub fn add_layered_driver(&mut self, name: &str) -> Result<bool, SelectionError> {
        ensure_known(CatalogKind::LayeredDriver, name)?;
        let added = self.selection.layered_drivers.insert(name.to_string());
        self.recompute();
        Ok(added)
    }

    /// Returns whether the name was present.
    pub fn remove_hardware_library(&mut self, name: &str) -> bool {
        let removed = self.selection.hardware_libs.remove(name);
        self.recompute();
        removed
    }

    pub fn remove_third_party_library(&mut self, name: &str) -> bool {
        let removed = self.selection.third_party_libs.remove(name);
        self.recompute();
        removed
    }

    pub fn remove_layered_driver(&mut self, name: &str) -> bool {
        let removed = self.selection.layered_drivers.remove(name);
        self.recompute();
        removed
    }

    pub fn set_prebuilt_kind(&mut self, kind: PrebuiltKind) {
        self.selection.prebuilt_kind = kind;
        self.recompute();
    }

    /// Replace the custom definitions. Rejects the whole list, leaving the
    /// selection untouched, if any entry is not verbatim-safe.
    pub fn set_custom_definitions(
        &mut self,
        definitions: Vec<String>,
    ) -> Result<(), SelectionError> {
        ensure_verbatim("custom definition", &definitions)?;
        self.selection.custom_definitions = definitions;
        self.recompute();
        Ok(())
    }

    pub fn set_custom_linker_flags(&mut self, flags: Vec<String>) -> Result<(), SelectionError> {
        ensure_verbatim("custom linker flag", &flags)?;
        self.selection.custom_linker_flags = flags;
        self.recompute();
        Ok(())
    }

    /// False if any selected item's catalog entry excludes `chipset`.
    pub fn is_selection_supported_on(&self, chipset: Chipset) -> bool {
        self.unsupported_on(chipset).is_empty()
    }

    /// Selected items that cannot be built for `chipset`, in catalog-kind order.
    ///
    /// Names no longer present in the catalog count as unsupported.
    pub fn unsupported_on(&self, chipset: Chipset) -> Vec<UnsupportedItem> {
        let mut out = Vec::new();
        let mut check = |kind, name: &String, supported: Option<bool>| {
            if !supported.unwrap_or(false) {
                out.push(UnsupportedItem { kind, name: name.clone() });
            }
        };
        for name in &self.selection.hardware_libs {
            let supported = catalog::hardware_library(name).map(|e| e.supports(chipset));
            check(CatalogKind::HardwareLibrary, name, supported);
        }
        for name in &self.selection.third_party_libs {
            let supported = catalog::third_party_library(name).map(|e| e.supports(chipset));
            check(CatalogKind::ThirdPartyLibrary, name, supported);
        }
        for name in &self.selection.layered_drivers {
            let supported = catalog::layered_driver(name).map(|e| e.supports(chipset));
            check(CatalogKind::LayeredDriver, name, supported);
        }
        out
    }

    fn recompute(&mut self) {
        self.inputs = AggregateBuildInputs::from_selection(&self.selection);
        tracing::debug!(
            hardware = self.selection.hardware_libs.len(),
            third_party = self.selection.third_party_libs.len(),
            layered = self.selection.layered_drivers.len(),
            prebuilt = %self.selection.prebuilt_kind,
            "Recomputed build inputs"
        );
    }
}

fn ensure_known(kind: CatalogKind, name: &str) -> Result<(), SelectionError> {
    if catalog::contains(kind, name) {
        Ok(())
    } else {
        Err(SelectionError::NotFound { kind, name: name.to_string() })
    }
}

fn ensure_verbatim(field: &'static str, values: &[String]) -> Result<(), SelectionError> {
    match values.iter().find(|value| !is_verbatim_safe(value)) {
        Some(value) => Err(SelectionError::InvalidVerbatim { field, value: value.clone() }),
        None => Ok(()),
    }
}
