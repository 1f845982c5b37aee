//! Implementation of `podlink status`.

use std::fmt;
use std::path::PathBuf;

use crate::core::{PodBundle, Project};
use crate::integrator::{includes_target, PODS_GROUP};
use crate::util::fs::is_strictly_inside;

/// How a build configuration relates to the generated xcconfig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Base configuration is the generated xcconfig
    Linked,
    /// No base configuration yet
    Unlinked,
    /// Base configuration is some other file inside the sandbox
    Stale,
    /// Custom base configuration that includes the generated xcconfig
    CustomIncludes,
    /// Custom base configuration that does not include it
    Custom,
    /// The bundle generated no xcconfig for this configuration
    Unmapped,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkState::Linked => "linked",
            LinkState::Unlinked => "not linked",
            LinkState::Stale => "stale",
            LinkState::CustomIncludes => "custom (includes pods)",
            LinkState::Custom => "custom",
            LinkState::Unmapped => "no generated xcconfig",
        };
        f.write_str(s)
    }
}

/// Current state of one build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationStatus {
    pub target: String,
    pub configuration: String,
    /// Path of the current base configuration reference
    pub base_path: Option<String>,
    /// Real path of the current base configuration reference
    pub base_real_path: Option<PathBuf>,
    /// Generated xcconfig path the configuration should use
    pub expected: Option<String>,
    pub state: LinkState,
}

/// Describe every build configuration of the project. Read-only.
///
/// A configuration only counts as linked when its base reference is the
/// generated file's member of the Pods group, matching what `integrate` keeps.
pub fn status(bundle: &PodBundle, project: &Project) -> Vec<ConfigurationStatus> {
    let mut statuses = Vec::new();
    let pods_group = project.tree.find_group(PODS_GROUP);

    for target in &project.targets {
        for config in &target.configurations {
            let expected = bundle.xcconfig_relative_path(&config.name).ok();
            let existing = config.base_configuration_reference;
            let base = existing.and_then(|id| project.tree.file(id).map(|f| f.path.clone()));
            let base_real_path = existing.and_then(|id| project.tree.real_path(id));
            let generated = match (pods_group, &expected) {
                (Some(group), Some(path)) => project.tree.group(group).find_file(path),
                _ => None,
            };

            let state = match (&expected, existing, &base_real_path) {
                (None, _, _) => LinkState::Unmapped,
                (Some(_), None, _) => LinkState::Unlinked,
                (Some(_), Some(id), _) if generated == Some(id) => LinkState::Linked,
                // Unknown references are replaced like sandboxed ones
                (Some(_), Some(_), None) => LinkState::Stale,
                (Some(_), Some(_), Some(real)) if is_strictly_inside(real, bundle.sandbox_root()) => {
                    LinkState::Stale
                }
                (Some(expected), Some(_), Some(real)) => {
                    if includes_target(Some(real), expected) {
                        LinkState::CustomIncludes
                    } else {
                        LinkState::Custom
                    }
                }
            };

            statuses.push(ConfigurationStatus {
                target: target.name.clone(),
                configuration: config.name.clone(),
                base_path: base,
                base_real_path,
                expected,
                state,
            });
        }
    }

    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuildConfiguration, Target};
    use crate::test_support::TestSandbox;

    #[test]
    fn test_status_states() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        sandbox.write("Config/Includes.xcconfig", "#include \"Pods/Pods.debug.xcconfig\"\n");
        sandbox.write("Config/Custom.xcconfig", "A = 1\n");

        let mut project = sandbox.project();
        let group = project.tree.ensure_group("Pods").unwrap();
        let generated = project.tree.new_file(group, "Pods/Pods.debug.xcconfig").unwrap();
        let stale = project.tree.add_file("Pods/Old.xcconfig").unwrap();
        let includes = project.tree.add_file("Config/Includes.xcconfig").unwrap();
        let custom = project.tree.add_file("Config/Custom.xcconfig").unwrap();

        let config = |base| BuildConfiguration::new("Debug").with_base_configuration(base);
        project.targets = vec![
            Target::new("Linked").with_configuration(config(generated)),
            Target::new("Unlinked").with_configuration(BuildConfiguration::new("Debug")),
            Target::new("Stale").with_configuration(config(stale)),
            Target::new("Includes").with_configuration(config(includes)),
            Target::new("Custom").with_configuration(config(custom)),
            Target::new("Unmapped").with_configuration(BuildConfiguration::new("Staging")),
        ];

        let states: Vec<_> = status(&bundle, &project)
            .into_iter()
            .map(|s| (s.target, s.state))
            .collect();

        assert_eq!(
            states,
            vec![
                ("Linked".to_string(), LinkState::Linked),
                ("Unlinked".to_string(), LinkState::Unlinked),
                ("Stale".to_string(), LinkState::Stale),
                ("Includes".to_string(), LinkState::CustomIncludes),
                ("Custom".to_string(), LinkState::Custom),
                ("Unmapped".to_string(), LinkState::Unmapped),
            ]
        );
    }

    #[test]
    fn test_status_does_not_mutate() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let project = sandbox
            .project()
            .with_target(Target::new("App").with_configuration(BuildConfiguration::new("Debug")));
        let before = project.to_toml_string().unwrap();

        let statuses = status(&bundle, &project);

        assert_eq!(statuses[0].expected.as_deref(), Some("Pods/Pods.debug.xcconfig"));
        assert!(statuses[0].base_path.is_none());
        assert_eq!(project.to_toml_string().unwrap(), before);
    }

    #[test]
    fn test_loose_generated_path_is_stale() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle().with_configurations(["Release"]);
        let mut project = sandbox.project();
        // Same path as the generated file, but not a member of the Pods group
        let loose = project.tree.add_file("Pods/Pods.release.xcconfig").unwrap();
        project.targets.push(
            Target::new("App")
                .with_configuration(BuildConfiguration::new("Release").with_base_configuration(loose)),
        );

        assert_eq!(status(&bundle, &project)[0].state, LinkState::Stale);

        let report =
            crate::integrator::integrate(&bundle, &mut project, &Default::default()).unwrap();
        assert!(matches!(
            report.results[0].outcome,
            crate::integrator::LinkOutcome::Replaced { .. }
        ));
        assert_eq!(status(&bundle, &project)[0].state, LinkState::Linked);
    }
}
