//! Core data structures for podlink.
//!
//! - The pod bundle (what the dependency manager generated)
//! - The project description tree (file references and groups)
//! - User targets and their build configurations

pub mod bundle;
pub mod project;
pub mod target;

pub use bundle::{BundleError, PodBundle};
pub use project::{
    FileRefId, FileReference, FileTree, Group, GroupId, Project, ProjectError, PROJECT_FILE_NAME,
};
pub use target::{BuildConfiguration, Target};
