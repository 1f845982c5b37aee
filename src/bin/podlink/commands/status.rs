//! `podlink status` command

use anyhow::{Context, Result};
use serde_json::json;

use super::ProjectContext;
use crate::cli::StatusArgs;
use podlink::core::Project;
use podlink::ops::{status, LinkState};
use podlink::util::shell::Shell;
use podlink::util::GlobalContext;

pub fn execute(args: StatusArgs, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let project_ctx = ProjectContext::load(&ctx, &args.project)?;
    let project = Project::load(&project_ctx.path)
        .with_context(|| format!("failed to load {}", project_ctx.path.display()))?;

    let statuses = status(&project_ctx.bundle, &project);

    let mut current_target: Option<&str> = None;
    for s in &statuses {
        shell.json_event(&json!({
            "reason": "status",
            "target": s.target,
            "configuration": s.configuration,
            "state": s.state.to_string(),
            "base": s.base_path,
            "expected": s.expected,
        }));
        if shell.is_json() {
            continue;
        }

        if current_target != Some(s.target.as_str()) {
            println!("{}", s.target);
            current_target = Some(s.target.as_str());
        }

        let detail = match (s.state, &s.base_path, &s.expected) {
            (LinkState::Linked, Some(base), _) => base.clone(),
            (LinkState::Unmapped, _, _) => String::new(),
            (_, Some(base), Some(expected)) => format!("{} (expected {})", base, expected),
            (_, None, Some(expected)) => format!("(expected {})", expected),
            _ => String::new(),
        };
        println!(
            "  {:<16} {:<24} {}",
            s.configuration,
            s.state.to_string(),
            detail
        );
    }

    if statuses.is_empty() {
        shell.note("project has no targets");
    }

    Ok(())
}
