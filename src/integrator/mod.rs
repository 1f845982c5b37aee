//! Links user targets to the xcconfigs generated for a pod bundle.
//!
//! An integration pass:
//! 1. removes xcconfig references left over from older sandbox layouts,
//! 2. locates (or creates) the `Pods` group,
//! 3. links every selected target x configuration pair,
//! 4. optionally checks configurations for settings that shadow generated ones.
//!
//! The pass only mutates the in-memory [`Project`]; saving it is up to the
//! caller. Running it twice yields no mutation on the second run.

pub mod cleanup;
pub mod include;
pub mod linker;
pub mod overrides;
pub mod warning;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::core::project::shadowed_members;
use crate::core::{FileReference, PodBundle, Project};

pub use cleanup::remove_legacy_xcconfigs;
pub use include::{includes_target, IncludeMatcher, SILENCE_WARNINGS_MARKER};
pub use linker::{link_configuration, LinkOutcome};
pub use overrides::check_overrides;
pub use warning::XcconfigWarning;

/// Name of the group holding generated file references.
pub const PODS_GROUP: &str = "Pods";

/// Options for an integration pass.
#[derive(Debug, Clone)]
pub struct IntegrateOptions {
    /// Targets to integrate (empty = all targets of the project)
    pub targets: Vec<String>,

    /// Warn about build settings overriding generated ones
    pub check_overrides: bool,
}

impl Default for IntegrateOptions {
    fn default() -> Self {
        IntegrateOptions {
            targets: Vec::new(),
            check_overrides: true,
        }
    }
}

/// Result of linking one build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationResult {
    pub target: String,
    pub configuration: String,
    /// Generated xcconfig path, relative to the client root
    pub xcconfig_path: String,
    pub outcome: LinkOutcome,
}

/// Everything an integration pass did.
#[derive(Debug, Clone, Default)]
pub struct IntegrationReport {
    /// Legacy references removed from the project
    pub removed: Vec<FileReference>,
    /// Whether the `Pods` group had to be created
    pub created_group: bool,
    /// One entry per linked configuration, in project order
    pub results: Vec<ConfigurationResult>,
    /// All warnings, in the order they were raised
    pub warnings: Vec<XcconfigWarning>,
}

impl IntegrationReport {
    /// Whether the project was modified and needs saving.
    pub fn changed(&self) -> bool {
        self.created_group
            || !self.removed.is_empty()
            || self.results.iter().any(|r| r.outcome.is_mutation())
    }

    /// Number of configurations whose base configuration was (re)pointed.
    pub fn linked_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_mutation())
            .count()
    }
}

/// Run an integration pass of `bundle` into `project`.
pub fn integrate(
    bundle: &PodBundle,
    project: &mut Project,
    opts: &IntegrateOptions,
) -> Result<IntegrationReport> {
    for name in &opts.targets {
        if project.target(name).is_none() {
            bail!("target `{}` not found in project", name);
        }
    }

    let mut report = IntegrationReport {
        removed: remove_legacy_xcconfigs(
            project,
            bundle.sandbox_root(),
            bundle.target_support_files_root(),
        ),
        ..Default::default()
    };

    report.created_group = project.tree.find_group(PODS_GROUP).is_none();
    let pods_group = project
        .tree
        .ensure_group(PODS_GROUP)
        .context("failed to create the Pods group")?;

    let shadowed = shadowed_members(project.tree.group(pods_group), &project.tree);
    if !shadowed.is_empty() {
        debug!("{} duplicate references in the Pods group are ignored", shadowed.len());
    }

    let selected = |name: &str| opts.targets.is_empty() || opts.targets.iter().any(|t| t == name);

    for target in project.targets.iter_mut().filter(|t| selected(&t.name)) {
        for config in target.configurations.iter_mut() {
            let xcconfig_path = bundle
                .xcconfig_relative_path(&config.name)
                .with_context(|| format!("cannot integrate `{} [{}]`", target.name, config.name))?;

            let outcome =
                link_configuration(bundle, &mut project.tree, pods_group, &target.name, config)
                    .with_context(|| {
                        format!("failed to link `{} [{}]`", target.name, config.name)
                    })?;

            if let Some(warning) = outcome.warning() {
                report.warnings.push(warning.clone());
            }

            if opts.check_overrides {
                report
                    .warnings
                    .extend(check_overrides(bundle, &target.name, config)?);
            }

            report.results.push(ConfigurationResult {
                target: target.name.clone(),
                configuration: config.name.clone(),
                xcconfig_path,
                outcome,
            });
        }
    }

    info!(
        "integrated {} configurations ({} linked, {} warnings)",
        report.results.len(),
        report.linked_count(),
        report.warnings.len()
    );

    Ok(report)
}
