//! ft9xx-core
//!
//! Core library for FT90x/FT93x firmware projects.
//!
//! This crate holds the component catalogs, the selection aggregator, the
//! `CMakeLists.txt` region synthesizer, and the parsers for FT32 toolchain
//! output, plus thin services for running the toolchain and persisting a
//! project's configuration.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, editor integrations, etc.).

pub mod catalog;
pub mod descriptor;
pub mod project;
pub mod selection;
pub mod services;
pub mod toolchain;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
