//! Command implementations

pub mod completions;
pub mod integrate;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::cli::ProjectArgs;
use podlink::core::{PodBundle, PROJECT_FILE_NAME};
use podlink::ops::bundle_from_config;
use podlink::util::diagnostic::suggestions;
use podlink::util::{Config, GlobalContext};

/// The project file, its configuration, and the bundle to integrate.
pub struct ProjectContext {
    pub path: PathBuf,
    pub config: Config,
    pub bundle: PodBundle,
}

impl ProjectContext {
    /// Locate the project and build the bundle from config files and flags.
    ///
    /// Flags take precedence over `.podlink/config.toml`.
    pub fn load(ctx: &GlobalContext, args: &ProjectArgs) -> Result<Self> {
        let path = match &args.project {
            Some(path) => {
                let path = ctx.resolve(path);
                if path.is_dir() {
                    path.join(PROJECT_FILE_NAME)
                } else {
                    path
                }
            }
            None => ctx
                .find_project()
                .map_err(|e| anyhow!("{}\nhelp: {}", e, suggestions::NO_PROJECT))?,
        };
        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let mut config = ctx.load_config(&root);
        if let Some(label) = &args.label {
            config.bundle.label = Some(label.clone());
        }
        if let Some(sandbox) = &args.sandbox {
            config.bundle.sandbox = Some(sandbox.clone());
        }
        if let Some(dir) = &args.support_files_dir {
            config.bundle.support_files_dir = Some(dir.clone());
        }
        if !args.configurations.is_empty() {
            config.bundle.configurations = args.configurations.clone();
        }

        let bundle = bundle_from_config(&config.bundle, &root);

        Ok(ProjectContext {
            path,
            config,
            bundle,
        })
    }
}
