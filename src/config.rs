use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::WalkError;
use crate::guard::DEFAULT_MAX_DEPTH;

pub const CONFIG_FILE_NAME: &str = "opwalk.toml";

/// Settings for walkers driven by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerConfig {
    pub max_depth: u32,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ---- TOML deserialization types ----

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    walker: Option<TomlWalker>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TomlWalker {
    max_depth: Option<u32>,
}

impl WalkerConfig {
    /// Parse config text. `path` is only used for error reporting.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, WalkError> {
        let parsed: TomlConfig = toml::from_str(text)
            .map_err(|e| WalkError::config(format!("{CONFIG_FILE_NAME}: {e}"), path.to_path_buf()))?;

        let mut config = WalkerConfig::default();
        if let Some(max_depth) = parsed.walker.and_then(|w| w.max_depth) {
            if max_depth == 0 {
                return Err(WalkError::config(
                    "[walker] max-depth must be at least 1",
                    path.to_path_buf(),
                ));
            }
            config.max_depth = max_depth;
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, WalkError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            WalkError::config(format!("cannot read {CONFIG_FILE_NAME}: {e}"), path.to_path_buf())
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Look for `opwalk.toml` from `start_dir` upwards and load it, or fall
    /// back to defaults when there is none.
    pub fn discover(start_dir: &Path) -> Result<Self, WalkError> {
        match find_config_walk(start_dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading walker config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

// ---- Config discovery ----

/// Walk from start_dir up to .git or FS root, looking for opwalk.toml.
fn find_config_walk(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        // .git may be a file in worktrees and submodules
        if dir.join(".git").exists() {
            return None;
        }
        if !dir.pop() {
            return None;
        }
    }
}
