//! Parsers for FT32 toolchain output.
//!
//! - `size`: `ft32-elf-size --format=berkeley -x` summary line.
//! - `symbols`: `ft32-elf-objdump -t` symbol table.
//!
//! Both are pure functions over the captured stdout; running the tools lives
//! in `services::toolchain`.

pub mod size;
pub mod symbols;

pub use size::{parse_image_size_summary, ImageSizeSummary, SizeParseError};
pub use symbols::{parse_symbol_table, Symbol, SymbolTable};
