//! Test utilities for podlink unit tests.
//!
//! [`TestSandbox`] gives every test its own client root on disk, so that
//! real paths, sandbox containment, and xcconfig reads behave as they do in
//! a real project.
//!
//! # Example
//!
//! ```rust,ignore
//! let sandbox = TestSandbox::new();
//! let bundle = sandbox.bundle();
//! sandbox.write("Config/Custom.xcconfig", "#include \"Pods/Pods.debug.xcconfig\"");
//! let mut project = sandbox.project().with_target(app_target(&["Debug"]));
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::{PodBundle, Project};

pub use fixtures::*;

/// A temporary client root holding a user project and a `Pods` sandbox.
pub struct TestSandbox {
    _tmp: TempDir,
    root: PathBuf,
}

impl TestSandbox {
    /// Create an empty client root.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        std::fs::create_dir_all(root.join("Pods")).unwrap();
        TestSandbox { _tmp: tmp, root }
    }

    /// The client root (canonical).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a file below the client root and return its absolute path.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Bundle `Pods` with xcconfigs directly in the sandbox:
    /// `Pods/Pods.<config>.xcconfig`.
    pub fn bundle(&self) -> PodBundle {
        PodBundle::new("Pods", &self.root, "Pods").with_support_files_dir("Pods")
    }

    /// Bundle `Pods` with the standard layout:
    /// `Pods/Target Support Files/Pods/Pods.<config>.xcconfig`.
    pub fn standard_bundle(&self) -> PodBundle {
        PodBundle::new("Pods", &self.root, "Pods")
    }

    /// An empty project rooted at the client root.
    pub fn project(&self) -> Project {
        Project::new(&self.root)
    }
}

impl Default for TestSandbox {
    fn default() -> Self {
        Self::new()
    }
}
