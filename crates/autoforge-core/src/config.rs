use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the per-workspace private directory.
pub const PRIVATE_DIR_NAME: &str = ".autoforge";

/// Setting this to `1`/`true`/`yes` suppresses redundancy advisories.
pub const QUIET_ENV_VAR: &str = "AUTOFORGE_QUIET";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Options for dependency graph construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Do not emit warnings for redundant dependency declarations.
    /// They are still recorded on the graph.
    #[serde(default)]
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// File (relative to the private directory) holding the saved selection.
    #[serde(default = "default_selection_filename")]
    pub filename: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            filename: default_selection_filename(),
        }
    }
}

impl SelectionConfig {
    #[must_use]
    pub fn path(&self, workspace_dir: &Path) -> PathBuf {
        private_dir(workspace_dir).join(&self.filename)
    }
}

#[must_use]
pub fn private_dir(workspace_dir: &Path) -> PathBuf {
    workspace_dir.join(PRIVATE_DIR_NAME)
}

/// Load `<workspace>/.autoforge/config.toml`, falling back to defaults when
/// the file does not exist, then apply environment overrides.
pub fn load_config(workspace_dir: &Path) -> Result<ProjectConfig> {
    let path = private_dir(workspace_dir).join("config.toml");
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str::<ProjectConfig>(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        ProjectConfig::default()
    };

    apply_env_overrides(&mut config, env::var(QUIET_ENV_VAR).ok().as_deref());
    Ok(config)
}

fn apply_env_overrides(config: &mut ProjectConfig, env_quiet: Option<&str>) {
    if let Some(quiet) = env_quiet.and_then(parse_flag) {
        config.graph.quiet = quiet;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_selection_filename() -> String {
    "selected".to_string()
}
