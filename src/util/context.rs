//! Global context for podlink operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::project::{ProjectError, PROJECT_FILE_NAME};
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global podlink data (~/.podlink/)
    home: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            home: config::global_config_dir(),
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Override the home directory (mostly for tests).
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the podlink home directory (~/.podlink/), if one can be determined.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|home| home.join("config.toml"))
    }

    /// Load the merged global + project configuration for a project directory.
    pub fn load_config(&self, project_root: &Path) -> Config {
        let global = self.config_path();
        config::load_config(global.as_deref(), &config::project_config_path(project_root))
    }

    /// Resolve a path given on the command line against the cwd.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        crate::util::fs::resolve_against(&self.cwd, path)
    }

    /// Find the project description starting from cwd and searching upward.
    pub fn find_project(&self) -> Result<PathBuf, ProjectError> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(PROJECT_FILE_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ProjectError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_project_walks_up() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join(PROJECT_FILE_NAME);
        std::fs::write(&project, "").unwrap();
        let nested = tmp.path().join("Sources").join("App");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested).unwrap();
        assert_eq!(ctx.find_project().unwrap(), project);
    }

    #[test]
    fn test_find_project_not_found() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();

        // Only succeeds if some ancestor of the temp dir has a Project.toml
        if let Err(e) = ctx.find_project() {
            assert!(matches!(e, ProjectError::NotFound { .. }));
        }
    }

    #[test]
    fn test_load_config_uses_project_file() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::write(home.join("config.toml"), "[bundle]\nsandbox = \"Deps\"\n").unwrap();

        let project_root = tmp.path().join("App");
        std::fs::create_dir_all(project_root.join(".podlink")).unwrap();
        std::fs::write(
            project_root.join(".podlink").join("config.toml"),
            "[bundle]\nlabel = \"Pods-App\"\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_cwd(project_root.clone())
            .unwrap()
            .with_home(&home);
        let config = ctx.load_config(&project_root);

        assert_eq!(config.bundle.label(), "Pods-App");
        assert_eq!(config.bundle.sandbox(), PathBuf::from("Deps"));
    }
}
