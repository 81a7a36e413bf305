//! Stateful services layered over the pure core.
//!
//! - `toolchain`: runs `ft32-elf-size` / `ft32-elf-objdump` and feeds the parsers.
//! - `workspace`: per-workspace context that serializes selection changes
//!   and writes the regenerated descriptor back to its store.

pub mod toolchain;
pub mod workspace;
