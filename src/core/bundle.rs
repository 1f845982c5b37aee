//! The generated output of the dependency manager for one aggregate target.

use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::fs::{is_inside, normalize_path, relative_path, resolve_against, to_slash};

/// Name of the directory, inside the sandbox, holding per-target support files.
pub const TARGET_SUPPORT_FILES_DIR: &str = "Target Support Files";

/// Errors raised by a [`PodBundle`].
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BundleError {
    #[error("no xcconfig was generated for build configuration `{name}` of `{label}`")]
    #[diagnostic(
        code(podlink::bundle::unknown_configuration),
        help("Align the target's build configurations with the bundle configurations")
    )]
    UnknownConfiguration {
        label: String,
        name: String,
        known: Vec<String>,
    },
}

/// An aggregate target's generated files, as seen by the integrator.
///
/// All roots are stored as normalized absolute paths so that containment
/// checks against file reference real paths are exact.
#[derive(Debug, Clone)]
pub struct PodBundle {
    /// Aggregate target label (`Pods`, `Pods-App`, ...)
    label: String,
    /// Directory holding the user project
    client_root: PathBuf,
    /// Directory the dependency manager owns
    sandbox_root: PathBuf,
    /// Root of all per-target support files
    target_support_files_root: PathBuf,
    /// Directory holding this label's generated xcconfigs
    support_files_dir: PathBuf,
    /// Build configurations an xcconfig was generated for
    configurations: Vec<String>,
}

impl PodBundle {
    /// Create a bundle with the standard layout:
    /// `<sandbox>/Target Support Files/<label>/<label>.<config>.xcconfig`.
    ///
    /// A relative `sandbox_root` is resolved against `client_root`.
    pub fn new(
        label: impl Into<String>,
        client_root: impl AsRef<Path>,
        sandbox_root: impl AsRef<Path>,
    ) -> Self {
        let label = label.into();
        let client_root = normalize_path(client_root.as_ref());
        let sandbox_root = normalize_path(&resolve_against(&client_root, sandbox_root.as_ref()));
        let target_support_files_root = sandbox_root.join(TARGET_SUPPORT_FILES_DIR);
        let support_files_dir = target_support_files_root.join(&label);

        PodBundle {
            label,
            client_root,
            sandbox_root,
            target_support_files_root,
            support_files_dir,
            configurations: vec!["Debug".to_string(), "Release".to_string()],
        }
    }

    /// Use a different target support files root.
    ///
    /// Also moves the support files dir to `<root>/<label>`.
    pub fn with_target_support_files_root(mut self, root: impl AsRef<Path>) -> Self {
        self.target_support_files_root =
            normalize_path(&resolve_against(&self.client_root, root.as_ref()));
        self.support_files_dir = self.target_support_files_root.join(&self.label);
        self
    }

    /// Use a different directory for this label's xcconfigs.
    ///
    /// The target support files root always contains the support files dir;
    /// when `dir` lies outside of it, `dir` becomes the root.
    pub fn with_support_files_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.support_files_dir = normalize_path(&resolve_against(&self.client_root, dir.as_ref()));
        if !is_inside(&self.support_files_dir, &self.target_support_files_root) {
            self.target_support_files_root = self.support_files_dir.clone();
        }
        self
    }

    /// Set the build configurations an xcconfig was generated for.
    pub fn with_configurations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.configurations = names.into_iter().map(Into::into).collect();
        self
    }

    /// Get the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the client (user project) root.
    pub fn client_root(&self) -> &Path {
        &self.client_root
    }

    /// Get the sandbox root.
    pub fn sandbox_root(&self) -> &Path {
        &self.sandbox_root
    }

    /// Get the target support files root.
    pub fn target_support_files_root(&self) -> &Path {
        &self.target_support_files_root
    }

    /// Get the directory holding this label's xcconfigs.
    pub fn support_files_dir(&self) -> &Path {
        &self.support_files_dir
    }

    /// Get the generated configuration names.
    pub fn configurations(&self) -> &[String] {
        &self.configurations
    }

    /// Check whether an xcconfig was generated for a configuration.
    pub fn has_configuration(&self, name: &str) -> bool {
        self.configurations.iter().any(|c| c == name)
    }

    /// Absolute path of the generated xcconfig for a configuration.
    pub fn xcconfig_path(&self, name: &str) -> Result<PathBuf, BundleError> {
        if !self.has_configuration(name) {
            return Err(BundleError::UnknownConfiguration {
                label: self.label.clone(),
                name: name.to_string(),
                known: self.configurations.clone(),
            });
        }

        let variant = name.replace('/', "-").to_lowercase();
        Ok(self
            .support_files_dir
            .join(format!("{}.{}.xcconfig", self.label, variant)))
    }

    /// Path of the generated xcconfig relative to the client root, with `/`
    /// separators. This is the path stored in the project file reference.
    pub fn xcconfig_relative_path(&self, name: &str) -> Result<String, BundleError> {
        let absolute = self.xcconfig_path(name)?;
        Ok(to_slash(&relative_path(&self.client_root, &absolute)))
    }
}
