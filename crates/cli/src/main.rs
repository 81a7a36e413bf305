use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ft9xx::commands::*;
use ft9xx_core::catalog::CatalogKind;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// FT9xx project toolkit CLI.
///
/// Keeps a project's `CMakeLists.txt` generated regions in sync with its
/// library selection, and reads toolchain output for built images. All
/// substantive logic lives in `ft9xx-core` (exposed in code as `ft9xx_core`).
#[derive(Parser, Debug)]
#[command(name = "ft9xx", version, about = "FT90x/FT93x project toolkit", long_about = None)]
struct Cli {
    /// Enable debug logging (stderr).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Catalog a library name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LibraryKindArg {
    Hardware,
    ThirdParty,
    LayeredDriver,
}

impl From<LibraryKindArg> for CatalogKind {
    fn from(kind: LibraryKindArg) -> Self {
        match kind {
            LibraryKindArg::Hardware => CatalogKind::HardwareLibrary,
            LibraryKindArg::ThirdParty => CatalogKind::ThirdPartyLibrary,
            LibraryKindArg::LayeredDriver => CatalogKind::LayeredDriver,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new FT9xx project at the given root.
    ///
    /// This will:
    /// - Create a `.ft9xx` metadata directory with `project.json`.
    /// - Create `Sources` and `Includes` directories.
    /// - Write a default `CMakeLists.txt` if none exists.
    InitProject {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional project name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,

        /// Target chipset (FT90x or FT93x). Defaults to FT90x.
        #[arg(long)]
        chipset: Option<String>,
    },

    /// Show basic information about an existing project.
    ProjectInfo {
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Add a hardware library, third-party library or layered driver.
    AddLibrary {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long, value_enum)]
        kind: LibraryKindArg,

        /// Catalog name, e.g. `UART Driver` or `FreeRTOS`.
        #[arg(long)]
        name: String,
    },

    /// Remove a library from the selection.
    RemoveLibrary {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long, value_enum)]
        kind: LibraryKindArg,

        #[arg(long)]
        name: String,
    },

    /// Choose the pre-built D2XX library variant.
    SetPrebuilt {
        #[arg(long, default_value = ".")]
        root: String,

        /// One of: none, d2xx, d2xx-rtos.
        #[arg(long)]
        kind: String,
    },

    /// Replace the custom compile definitions (each emitted verbatim).
    SetCustomDefinitions {
        #[arg(long, default_value = ".")]
        root: String,

        /// Definitions, e.g. `-DDEBUG=1`. Pass none to clear.
        #[arg(value_name = "DEFINITION", allow_hyphen_values = true)]
        definitions: Vec<String>,
    },

    /// Replace the custom linker flags (each emitted verbatim).
    SetCustomLinkerFlags {
        #[arg(long, default_value = ".")]
        root: String,

        /// Flags, e.g. `-Wl,--print-memory-usage`. Pass none to clear.
        #[arg(value_name = "FLAG", allow_hyphen_values = true)]
        flags: Vec<String>,
    },

    /// Re-render every generated region from the saved selection.
    Regenerate {
        #[arg(long, default_value = ".")]
        root: String,
    },

    /// Check whether the current selection builds for a chipset.
    CheckChipset {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        chipset: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Switch the project's target chipset.
    SetChipset {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        chipset: String,
    },

    /// Switch the project's build mode (debug or release).
    SetBuildMode {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        mode: String,
    },

    /// List the built-in library catalog.
    ListCatalog {
        /// Only list one catalog.
        #[arg(long, value_enum)]
        kind: Option<LibraryKindArg>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Report text/data/bss sizes of a firmware image.
    ImageSize {
        #[arg(long, default_value = ".")]
        root: String,

        /// Image to analyze. Defaults to `<chipset>_<mode>/<name>.elf` under the root.
        #[arg(long)]
        elf: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List symbols of a firmware image.
    Symbols {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        elf: Option<String>,

        /// Only list symbols in this section (e.g. `.text`).
        #[arg(long)]
        section: Option<String>,

        /// Only list the N largest symbols.
        #[arg(long)]
        top: Option<usize>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Command::InitProject { root, name, chipset } => {
            init_project_command(&root, name, chipset.as_deref())?
        }
        Command::ProjectInfo { root, json } => project_info_command(&root, json)?,
        Command::AddLibrary { root, kind, name } => add_library_command(&root, kind.into(), &name)?,
        Command::RemoveLibrary { root, kind, name } => {
            remove_library_command(&root, kind.into(), &name)?
        }
        Command::SetPrebuilt { root, kind } => set_prebuilt_command(&root, &kind)?,
        Command::SetCustomDefinitions { root, definitions } => {
            set_custom_definitions_command(&root, definitions)?
        }
        Command::SetCustomLinkerFlags { root, flags } => {
            set_custom_linker_flags_command(&root, flags)?
        }
        Command::Regenerate { root } => regenerate_command(&root)?,
        Command::CheckChipset { root, chipset, json } => {
            check_chipset_command(&root, &chipset, json)?
        }
        Command::SetChipset { root, chipset } => set_chipset_command(&root, &chipset)?,
        Command::SetBuildMode { root, mode } => set_build_mode_command(&root, &mode)?,
        Command::ListCatalog { kind, json } => list_catalog_command(kind.map(Into::into), json)?,
        Command::ImageSize { root, elf, json } => image_size_command(&root, elf.as_deref(), json)?,
        Command::Symbols { root, elf, section, top, json } => {
            symbols_command(&root, elf.as_deref(), section.as_deref(), top, json)?
        }
    }

    Ok(())
}
