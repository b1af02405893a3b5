//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/alloctree/alloctree.toml`
//! 3. Local config: `<dir>/.alloctree.toml`
//! 4. Environment variables: `ALLOCTREE_*` prefix (`__` between sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Output settings for the read-back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Decimal places shown for values (allocation itself always keeps 4)
    pub decimals: usize,
    /// Colorize variance and status lines
    pub color: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            decimals: 2,
            color: true,
        }
    }
}

/// Raw display settings; `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplaySettings {
    pub decimals: Option<usize>,
    pub color: Option<bool>,
}

impl DisplaySettings {
    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawDisplaySettings) -> Self {
        Self {
            decimals: overlay.decimals.unwrap_or(self.decimals),
            color: overlay.color.unwrap_or(self.color),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub seed_file: Option<PathBuf>,
    #[serde(default)]
    pub display: RawDisplaySettings,
}

/// Unified configuration for alloctree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Seed forest (TOML); the built-in demo data is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
    /// Read-back formatting
    pub display: DisplaySettings,
}

/// Get the XDG config directory for alloctree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "alloctree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("alloctree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".alloctree.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
///
/// A relative `seed_file` is resolved against the directory of the config
/// file that names it.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    let mut raw: RawSettings = toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })?;

    if let Some(seed) = raw.seed_file.take() {
        let expanded = PathBuf::from(expand_env_vars(&seed.to_string_lossy()));
        raw.seed_file = Some(match path.parent() {
            Some(dir) if expanded.is_relative() => dir.join(expanded),
            _ => expanded,
        });
    }
    Ok(raw)
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(seed) = &self.seed_file {
            self.seed_file = Some(PathBuf::from(expand_env_vars(&seed.to_string_lossy())));
        }
    }

    /// Overlay config onto self (base); overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            seed_file: overlay
                .seed_file
                .clone()
                .or_else(|| self.seed_file.clone()),
            display: self.display.merge(&overlay.display),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.alloctree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply ALLOCTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ALLOCTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("seed_file") {
            settings.seed_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<usize>("display.decimals") {
            settings.display.decimals = val;
        }
        if let Ok(val) = config.get_bool("display.color") {
            settings.display.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# alloctree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/alloctree/alloctree.toml
#   Local:  <dir>/.alloctree.toml
#   Env:    ALLOCTREE_* environment variables (ALLOCTREE_DISPLAY__DECIMALS=3)

# Seed forest in TOML ([[nodes]] with nested [[nodes.children]]).
# Relative paths resolve against this file's directory.
# seed_file = "goods.toml"

[display]
# Decimal places shown for values
# decimals = 2

# Colorize variance output
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
