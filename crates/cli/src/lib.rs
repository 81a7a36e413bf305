//! Library half of the `ft9xx` CLI: one function per subcommand, so tests
//! can drive commands without spawning the binary.

pub mod commands;
