// Tools configuration - descriptor file loading
#![allow(dead_code)]

use crate::tools::error::Result;
use crate::tools::validate::RawToolSpec;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tools configuration
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Path to the tool descriptor file
    pub descriptor_path: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        let descriptor_path = dirs::home_dir()
            .map(|home| home.join(".coda").join("tools.toml"))
            .unwrap_or_else(|| PathBuf::from("tools.toml"));
        Self { descriptor_path }
    }
}

#[derive(Debug, Deserialize)]
struct ToolsFile {
    #[serde(default)]
    tool: Vec<RawToolSpec>,
}

/// Load raw tool specs from a TOML descriptor file. A missing file is not
/// an error; it just means no external tools are configured.
pub fn load_specs(path: &Path) -> Result<Vec<RawToolSpec>> {
    if !path.exists() {
        debug!(path = %path.display(), "tools.toml not found, no external tools");
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let parsed: ToolsFile = toml::from_str(&content)?;

    debug!(
        path = %path.display(),
        tool_count = parsed.tool.len(),
        "loaded tool specs from config"
    );
    Ok(parsed.tool)
}
