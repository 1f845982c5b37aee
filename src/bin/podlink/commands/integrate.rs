//! `podlink integrate` command

use anyhow::Result;
use serde_json::json;

use super::ProjectContext;
use crate::cli::IntegrateArgs;
use podlink::integrator::{IntegrateOptions, LinkOutcome};
use podlink::ops::integrate_project;
use podlink::util::shell::{Shell, Status};
use podlink::util::GlobalContext;

pub fn execute(args: IntegrateArgs, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let project = ProjectContext::load(&ctx, &args.project)?;

    let opts = IntegrateOptions {
        targets: args.targets,
        check_overrides: project.config.integrate.check_overrides && !args.no_override_check,
    };

    shell.status(
        Status::Integrating,
        format!("{} into {}", project.bundle.label(), project.path.display()),
    );

    let result = integrate_project(&project.bundle, &project.path, &opts, args.dry_run)?;
    let report = &result.report;

    for file in &report.removed {
        shell.status(Status::Removed, format!("legacy xcconfig {}", file.path));
        shell.json_event(&json!({
            "reason": "legacy-removed",
            "path": file.path,
        }));
    }

    for r in &report.results {
        let pair = format!("{} [{}]", r.target, r.configuration);
        match &r.outcome {
            LinkOutcome::Linked { .. } => {
                shell.status(Status::Linked, format!("{} -> {}", pair, r.xcconfig_path))
            }
            LinkOutcome::Replaced { .. } => {
                shell.status(Status::Replaced, format!("{} -> {}", pair, r.xcconfig_path))
            }
            LinkOutcome::Unchanged | LinkOutcome::CustomIncludes { .. } => {
                if shell.is_verbose() {
                    shell.status(Status::Unchanged, &pair);
                }
            }
            // Reported with the other warnings below
            LinkOutcome::Conflict(_) => {}
        }

        shell.json_event(&json!({
            "reason": "configuration",
            "target": r.target,
            "configuration": r.configuration,
            "xcconfig": r.xcconfig_path,
            "outcome": r.outcome.as_str(),
        }));
    }

    for warning in &report.warnings {
        shell.diagnostic(&warning.to_diagnostic());
        shell.json_event(&json!({
            "reason": "warning",
            "warning": serde_json::to_value(warning)?,
        }));
    }
    if !report.warnings.is_empty() {
        shell.warn(format!(
            "{} warning(s) need attention before the pods are fully linked",
            report.warnings.len()
        ));
    }

    if result.saved {
        shell.status(Status::Saved, project.path.display());
    } else if args.dry_run && report.changed() {
        shell.status(Status::Skipped, "dry run, project not saved");
    }

    shell.status(
        Status::Finished,
        format!(
            "{} configurations, {} linked, {} warnings",
            report.results.len(),
            report.linked_count(),
            report.warnings.len()
        ),
    );
    shell.json_event(&json!({
        "reason": "finished",
        "changed": report.changed(),
        "saved": result.saved,
        "warnings": report.warnings.len(),
    }));

    Ok(())
}
