use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::toolchain::{
    parse_image_size_summary, parse_symbol_table, ImageSizeSummary, SizeParseError, SymbolTable,
};

/// Env var naming the `ft32-elf-size` executable.
pub const SIZE_BIN_ENV: &str = "FT9XX_SIZE_BIN";
/// Env var naming the `ft32-elf-objdump` executable.
pub const OBJDUMP_BIN_ENV: &str = "FT9XX_OBJDUMP_BIN";
/// Test hook: file whose contents stand in for `size` stdout.
pub const FAKE_SIZE_OUTPUT_ENV: &str = "FT9XX_FAKE_SIZE_OUTPUT";
/// Test hook: file whose contents stand in for `objdump` stdout.
pub const FAKE_OBJDUMP_OUTPUT_ENV: &str = "FT9XX_FAKE_OBJDUMP_OUTPUT";

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("Binary not found at {0}")]
    MissingBinary(PathBuf),
    #[error("Failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    Failed { tool: String, status: String, stderr: String },
    #[error("Failed to read fake toolchain output {path}: {source}")]
    FakeOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] SizeParseError),
}

/// Tool paths as they may appear in project config; unset entries fall back
/// to the environment and then to `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objdump: Option<String>,
}

/// Resolved executables for one analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainPaths {
    pub size: PathBuf,
    pub objdump: PathBuf,
}

impl ToolchainPaths {
    pub fn resolve(config: &ToolchainConfig) -> Self {
        Self {
            size: resolve_tool(config.size.as_deref(), SIZE_BIN_ENV, "ft32-elf-size"),
            objdump: resolve_tool(config.objdump.as_deref(), OBJDUMP_BIN_ENV, "ft32-elf-objdump"),
        }
    }
}

fn resolve_tool(configured: Option<&str>, env_key: &str, default_name: &str) -> PathBuf {
    configured
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(env_key).map(PathBuf::from))
        .unwrap_or_else(|| {
            PathBuf::from(if cfg!(windows) {
                format!("{default_name}.exe")
            } else {
                default_name.to_string()
            })
        })
}

/// Run `size --format=berkeley -x` on `elf` and parse its summary.
pub fn image_size(paths: &ToolchainPaths, elf: &Path) -> Result<ImageSizeSummary, ToolchainError> {
    ensure_binary(elf)?;
    let stdout = match fake_output(FAKE_SIZE_OUTPUT_ENV)? {
        Some(body) => body,
        None => run_tool(&paths.size, [OsStr::new("--format=berkeley"), OsStr::new("-x"), elf.as_os_str()])?,
    };
    Ok(parse_image_size_summary(&stdout)?)
}

/// Run `objdump -t` on `elf` and parse its symbol table.
pub fn symbol_table(paths: &ToolchainPaths, elf: &Path) -> Result<SymbolTable, ToolchainError> {
    ensure_binary(elf)?;
    let stdout = match fake_output(FAKE_OBJDUMP_OUTPUT_ENV)? {
        Some(body) => body,
        None => run_tool(&paths.objdump, [OsStr::new("-t"), elf.as_os_str()])?,
    };
    Ok(parse_symbol_table(&elf.display().to_string(), &stdout))
}

fn ensure_binary(elf: &Path) -> Result<(), ToolchainError> {
    if elf.is_file() {
        Ok(())
    } else {
        Err(ToolchainError::MissingBinary(elf.to_path_buf()))
    }
}

fn fake_output(env_key: &str) -> Result<Option<String>, ToolchainError> {
    let Some(path) = std::env::var_os(env_key).map(PathBuf::from) else {
        return Ok(None);
    };
    tracing::debug!(path = %path.display(), "Using fake toolchain output");
    fs::read_to_string(&path).map(Some).map_err(|source| ToolchainError::FakeOutput { path, source })
}

/// Blocks until the tool exits; no timeout is applied.
fn run_tool<'a, I>(tool: &Path, args: I) -> Result<String, ToolchainError>
where
    I: IntoIterator<Item = &'a OsStr>,
{
    let tool_name = tool.display().to_string();
    let output = Command::new(tool)
        .args(args)
        .output()
        .map_err(|source| ToolchainError::Spawn { tool: tool_name.clone(), source })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(tool = %tool_name, status = %output.status, "Toolchain command failed");
        return Err(ToolchainError::Failed { tool: tool_name, status: output.status.to_string(), stderr });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
