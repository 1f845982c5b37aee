//! Implementation of `podlink integrate`.

use std::path::Path;

use anyhow::Result;

use crate::core::{PodBundle, Project};
use crate::integrator::{self, IntegrateOptions, IntegrationReport};
use crate::util::config::BundleConfig;

/// Outcome of integrating a project file.
#[derive(Debug)]
pub struct IntegrateResult {
    pub report: IntegrationReport,
    /// Whether the project description was written back
    pub saved: bool,
}

/// Build the pod bundle described by configuration.
///
/// Relative paths are resolved against `client_root`.
pub fn bundle_from_config(config: &BundleConfig, client_root: &Path) -> PodBundle {
    let mut bundle = PodBundle::new(config.label(), client_root, config.sandbox())
        .with_configurations(config.configurations());

    if let Some(root) = &config.support_files_root {
        bundle = bundle.with_target_support_files_root(root);
    }
    if let Some(dir) = &config.support_files_dir {
        bundle = bundle.with_support_files_dir(dir);
    }

    bundle
}

/// Load the project at `project_path`, integrate `bundle` into it, and save
/// it back when something changed.
///
/// With `dry_run`, the project file is never written.
pub fn integrate_project(
    bundle: &PodBundle,
    project_path: &Path,
    opts: &IntegrateOptions,
    dry_run: bool,
) -> Result<IntegrateResult> {
    let mut project = Project::load(project_path)?;
    let report = integrator::integrate(bundle, &mut project, opts)?;

    let saved = report.changed() && !dry_run;
    if saved {
        project.save(project_path)?;
        tracing::debug!("saved {}", project_path.display());
    } else if dry_run && report.changed() {
        tracing::info!("Dry run - project will not be modified");
    }

    Ok(IntegrateResult { report, saved })
}
