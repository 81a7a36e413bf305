use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Chipset;
use crate::selection::SelectionState;
use crate::services::toolchain::ToolchainConfig;

/// CMake build type the project is configured for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildMode {
    #[default]
    Debug,
    Release,
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildMode::Debug => "Debug",
            BuildMode::Release => "Release",
        })
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildMode::Debug),
            "release" => Ok(BuildMode::Release),
            other => Err(format!("Invalid build mode '{other}'. Allowed: Debug, Release")),
        }
    }
}

/// Serializable configuration describing an FT9xx project.
///
/// This lives at `.ft9xx/project.json` in the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Human-friendly project name; also the firmware image stem.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Schema/config version.
    pub config_version: String,
    pub chipset: Chipset,
    #[serde(default)]
    pub build_mode: BuildMode,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    #[serde(default)]
    pub selection: SelectionState,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>, chipset: Chipset) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            chipset,
            build_mode: BuildMode::default(),
            toolchain: ToolchainConfig::default(),
            selection: SelectionState::default(),
        }
    }
}
