//! Configuration file support for podlink.
//!
//! podlink reads two configuration file locations:
//! - Global: `~/.podlink/config.toml` - User-wide defaults
//! - Project: `.podlink/config.toml` next to `Project.toml` - Project overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default aggregate target label.
pub const DEFAULT_LABEL: &str = "Pods";

/// Default sandbox directory, relative to the project directory.
pub const DEFAULT_SANDBOX: &str = "Pods";

/// Build configurations generated when none are configured.
pub const DEFAULT_CONFIGURATIONS: &[&str] = &["Debug", "Release"];

/// podlink configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Description of the generated pod bundle
    pub bundle: BundleConfig,

    /// Integration behavior
    pub integrate: IntegrateConfig,
}

/// Where the dependency manager put its generated files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Aggregate target label, used in generated file names (e.g. `Pods-App`)
    pub label: Option<String>,

    /// Sandbox root, relative to the project directory
    pub sandbox: Option<PathBuf>,

    /// Target support files root, relative to the project directory
    pub support_files_root: Option<PathBuf>,

    /// Directory holding this label's xcconfigs, relative to the project directory
    pub support_files_dir: Option<PathBuf>,

    /// Build configuration names an xcconfig was generated for
    #[serde(default)]
    pub configurations: Vec<String>,
}

impl BundleConfig {
    /// The configured label or the default.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    /// The configured sandbox or the default.
    pub fn sandbox(&self) -> PathBuf {
        self.sandbox
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SANDBOX))
    }

    /// The configured configuration names or the defaults.
    pub fn configurations(&self) -> Vec<String> {
        if self.configurations.is_empty() {
            DEFAULT_CONFIGURATIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.configurations.clone()
        }
    }
}

/// Integration behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrateConfig {
    /// Warn when a build configuration overrides a generated setting
    #[serde(default = "default_true")]
    pub check_overrides: bool,
}

impl Default for IntegrateConfig {
    fn default() -> Self {
        IntegrateConfig {
            check_overrides: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.bundle.label.is_some() {
            self.bundle.label = other.bundle.label;
        }
        if other.bundle.sandbox.is_some() {
            self.bundle.sandbox = other.bundle.sandbox;
        }
        if other.bundle.support_files_root.is_some() {
            self.bundle.support_files_root = other.bundle.support_files_root;
        }
        if other.bundle.support_files_dir.is_some() {
            self.bundle.support_files_dir = other.bundle.support_files_dir;
        }
        if !other.bundle.configurations.is_empty() {
            self.bundle.configurations = other.bundle.configurations;
        }

        // Defaults to true, so only an explicit opt-out is carried over
        if !other.integrate.check_overrides {
            self.integrate.check_overrides = false;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.podlink/config.toml)
/// 2. Global config (~/.podlink/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global podlink config directory (~/.podlink).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".podlink"))
}

/// Get the project config path (.podlink/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".podlink").join("config.toml")
}
