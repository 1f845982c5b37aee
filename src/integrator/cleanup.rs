//! Removal of xcconfig references left behind by older sandbox layouts.
//!
//! Older layouts generated xcconfigs directly inside the sandbox instead of
//! the target support files root. References to them would otherwise be
//! matched as stale base configurations on every run.

use std::path::Path;

use tracing::debug;

use crate::core::{FileReference, Project};
use crate::util::fs::is_inside;

/// Remove tracked xcconfig references under `sandbox_root` but outside
/// `support_files_root`.
///
/// Base configurations pointing at a removed reference are cleared. Files on
/// disk are left alone. Returns the removed references in id order.
pub fn remove_legacy_xcconfigs(
    project: &mut Project,
    sandbox_root: &Path,
    support_files_root: &Path,
) -> Vec<FileReference> {
    let stale: Vec<_> = project
        .tree
        .files()
        .filter(|file| file.extension() == Some("xcconfig"))
        .filter(|file| {
            project.tree.real_path(file.id).is_some_and(|real| {
                is_inside(&real, sandbox_root) && !is_inside(&real, support_files_root)
            })
        })
        .map(|file| file.id)
        .collect();

    let mut removed = Vec::new();
    for id in stale {
        if let Some(file) = project.tree.remove_file(id) {
            debug!("removed legacy xcconfig {} ({})", file.path, file.id);
            removed.push(file);
        }
    }

    if !removed.is_empty() {
        for config in project
            .targets
            .iter_mut()
            .flat_map(|t| t.configurations.iter_mut())
        {
            if let Some(id) = config.base_configuration_reference {
                if removed.iter().any(|file| file.id == id) {
                    config.base_configuration_reference = None;
                }
            }
        }
    }

    removed
}
