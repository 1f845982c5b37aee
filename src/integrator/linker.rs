//! Per-configuration base configuration decisions.
//!
//! For one (target, configuration) pair the linker decides whether the base
//! configuration reference should point at the generated xcconfig, whether
//! it already does, or whether a user customization stands in the way.
//!
//! | existing base ref            | action                                  |
//! |------------------------------|-----------------------------------------|
//! | none                         | link the generated reference            |
//! | the generated reference      | nothing                                 |
//! | other, inside the sandbox    | replace with the generated reference    |
//! | other, outside, includes it  | nothing                                 |
//! | other, outside, no include   | warn, leave untouched                   |

use anyhow::Result;
use tracing::debug;

use crate::core::{BuildConfiguration, FileRefId, FileTree, GroupId, PodBundle};
use crate::integrator::include::includes_target;
use crate::integrator::warning::XcconfigWarning;
use crate::util::fs::is_strictly_inside;

/// What the linker did with one build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// There was no base configuration; it now points at the generated xcconfig.
    Linked { reference: FileRefId, created: bool },

    /// Already linked to the generated xcconfig.
    Unchanged,

    /// A stale reference inside the sandbox was replaced.
    Replaced {
        previous: FileRefId,
        reference: FileRefId,
        created: bool,
    },

    /// A custom config outside the sandbox includes the generated xcconfig
    /// (or carries the silence marker).
    CustomIncludes { existing: FileRefId },

    /// A custom config outside the sandbox was left in place.
    Conflict(XcconfigWarning),
}

impl LinkOutcome {
    /// Whether the project tree or configuration was modified.
    pub fn is_mutation(&self) -> bool {
        matches!(self, LinkOutcome::Linked { .. } | LinkOutcome::Replaced { .. })
    }

    /// The warning raised for this configuration, if any.
    pub fn warning(&self) -> Option<&XcconfigWarning> {
        match self {
            LinkOutcome::Conflict(warning) => Some(warning),
            _ => None,
        }
    }

    /// Short machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkOutcome::Linked { .. } => "linked",
            LinkOutcome::Unchanged => "unchanged",
            LinkOutcome::Replaced { .. } => "replaced",
            LinkOutcome::CustomIncludes { .. } => "custom-includes",
            LinkOutcome::Conflict(_) => "conflict",
        }
    }
}

/// Point `config` at the generated xcconfig of `bundle` when it is safe to.
///
/// `pods_group` is the group holding generated file references; a reference
/// for the generated path is created in it when missing. Fails when the
/// bundle generated no xcconfig for the configuration's name.
pub fn link_configuration(
    bundle: &PodBundle,
    tree: &mut FileTree,
    pods_group: GroupId,
    target_name: &str,
    config: &mut BuildConfiguration,
) -> Result<LinkOutcome> {
    let path = bundle.xcconfig_relative_path(&config.name)?;
    let generated = tree.group(pods_group).find_file(&path);

    let Some(existing) = config.base_configuration_reference else {
        let (reference, created) = set_generated(tree, pods_group, generated, &path, config)?;
        debug!("{} [{}]: linked {}", target_name, config.name, path);
        return Ok(LinkOutcome::Linked { reference, created });
    };

    if generated == Some(existing) {
        debug!("{} [{}]: already linked", target_name, config.name);
        return Ok(LinkOutcome::Unchanged);
    }

    let Some(existing_path) = tree.real_path(existing) else {
        // Not a file reference of this tree, so nothing to preserve
        let (reference, created) = set_generated(tree, pods_group, generated, &path, config)?;
        debug!(
            "{} [{}]: replaced unknown reference {}",
            target_name, config.name, existing
        );
        return Ok(LinkOutcome::Replaced {
            previous: existing,
            reference,
            created,
        });
    };

    if is_strictly_inside(&existing_path, bundle.sandbox_root()) {
        let (reference, created) = set_generated(tree, pods_group, generated, &path, config)?;
        debug!(
            "{} [{}]: replaced sandboxed {}",
            target_name,
            config.name,
            existing_path.display()
        );
        return Ok(LinkOutcome::Replaced {
            previous: existing,
            reference,
            created,
        });
    }

    if includes_target(Some(&existing_path), &path) {
        debug!(
            "{} [{}]: {} includes {}",
            target_name,
            config.name,
            existing_path.display(),
            path
        );
        return Ok(LinkOutcome::CustomIncludes { existing });
    }

    Ok(LinkOutcome::Conflict(XcconfigWarning::CustomBaseConfiguration {
        target: target_name.to_string(),
        configuration: config.name.clone(),
        xcconfig_path: path,
        existing_path,
    }))
}

fn set_generated(
    tree: &mut FileTree,
    pods_group: GroupId,
    generated: Option<FileRefId>,
    path: &str,
    config: &mut BuildConfiguration,
) -> Result<(FileRefId, bool)> {
    let (reference, created) = match generated {
        Some(reference) => (reference, false),
        None => (tree.new_file(pods_group, path)?, true),
    };
    config.base_configuration_reference = Some(reference);
    Ok((reference, created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BundleError;
    use crate::integrator::include::SILENCE_WARNINGS_MARKER;
    use crate::test_support::TestSandbox;

    #[test]
    fn test_links_when_absent() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let mut tree = FileTree::new(sandbox.root());
        let group = tree.ensure_group("Pods").unwrap();
        let mut config = BuildConfiguration::new("Release");

        let outcome = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        let reference = config.base_configuration_reference.unwrap();
        assert_eq!(
            outcome,
            LinkOutcome::Linked {
                reference,
                created: true
            }
        );
        assert_eq!(tree.file(reference).unwrap().path, "Pods/Pods.release.xcconfig");
        assert_eq!(tree.group(group).members(), &[reference]);
    }

    #[test]
    fn test_links_existing_generated_reference() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let mut tree = FileTree::new(sandbox.root());
        let group = tree.ensure_group("Pods").unwrap();
        let generated = tree.new_file(group, "Pods/Pods.debug.xcconfig").unwrap();
        let mut config = BuildConfiguration::new("Debug");

        let outcome = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        assert_eq!(
            outcome,
            LinkOutcome::Linked {
                reference: generated,
                created: false
            }
        );
        assert_eq!(tree.group(group).len(), 1);
    }

    #[test]
    fn test_unchanged_when_already_linked() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let mut tree = FileTree::new(sandbox.root());
        let group = tree.ensure_group("Pods").unwrap();
        let generated = tree.new_file(group, "Pods/Pods.debug.xcconfig").unwrap();
        let mut config = BuildConfiguration::new("Debug").with_base_configuration(generated);
        let before = config.clone();

        let outcome = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        assert_eq!(outcome, LinkOutcome::Unchanged);
        assert_eq!(config, before);
        assert_eq!(tree.files().count(), 1);
    }

    #[test]
    fn test_replaces_reference_inside_sandbox() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let mut tree = FileTree::new(sandbox.root());
        let stale = tree.add_file("Pods/Old/Pods.debug.xcconfig").unwrap();
        let group = tree.ensure_group("Pods").unwrap();
        let mut config = BuildConfiguration::new("Debug").with_base_configuration(stale);

        let outcome = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        let reference = config.base_configuration_reference.unwrap();
        assert_ne!(reference, stale);
        assert_eq!(
            outcome,
            LinkOutcome::Replaced {
                previous: stale,
                reference,
                created: true
            }
        );
        // The stale reference is left for legacy cleanup
        assert!(tree.contains(stale));
    }

    #[test]
    fn test_sibling_directory_is_not_inside_sandbox() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        sandbox.write("Pods-other/Custom.xcconfig", "// nothing here\n");
        let mut tree = FileTree::new(sandbox.root());
        let custom = tree.add_file("Pods-other/Custom.xcconfig").unwrap();
        let group = tree.ensure_group("Pods").unwrap();
        let mut config = BuildConfiguration::new("Debug").with_base_configuration(custom);

        let outcome = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        assert_eq!(outcome.as_str(), "conflict");
        assert_eq!(config.base_configuration_reference, Some(custom));
    }

    #[test]
    fn test_custom_config_with_include() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        sandbox.write(
            "Config/Custom.xcconfig",
            "#include \"Pods/Pods.release.xcconfig\"\nSWIFT_VERSION = 5.0\n",
        );
        let mut tree = FileTree::new(sandbox.root());
        let custom = tree.add_file("Config/Custom.xcconfig").unwrap();
        let group = tree.ensure_group("Pods").unwrap();
        let mut config = BuildConfiguration::new("Release").with_base_configuration(custom);

        let outcome = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        assert_eq!(outcome, LinkOutcome::CustomIncludes { existing: custom });
        assert!(outcome.warning().is_none());
        assert_eq!(config.base_configuration_reference, Some(custom));
        assert!(tree.group(group).is_empty());
    }

    #[test]
    fn test_custom_config_with_silence_marker() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        sandbox.write("Custom.xcconfig", SILENCE_WARNINGS_MARKER);
        let mut tree = FileTree::new(sandbox.root());
        let custom = tree.add_file("Custom.xcconfig").unwrap();
        let group = tree.ensure_group("Pods").unwrap();
        let mut config = BuildConfiguration::new("Debug").with_base_configuration(custom);

        let outcome = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        assert_eq!(outcome, LinkOutcome::CustomIncludes { existing: custom });
    }

    #[test]
    fn test_custom_config_without_include_warns() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let custom_path = sandbox.write("Users/me/Custom.xcconfig", "// nothing here");
        let mut tree = FileTree::new(sandbox.root());
        let custom = tree.add_file(custom_path.to_str().unwrap()).unwrap();
        let group = tree.ensure_group("Pods").unwrap();
        let mut config = BuildConfiguration::new("Release").with_base_configuration(custom);

        let outcome = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        assert_eq!(
            outcome,
            LinkOutcome::Conflict(XcconfigWarning::CustomBaseConfiguration {
                target: "App".to_string(),
                configuration: "Release".to_string(),
                xcconfig_path: "Pods/Pods.release.xcconfig".to_string(),
                existing_path: custom_path,
            })
        );
        assert!(!outcome.is_mutation());
        assert_eq!(config.base_configuration_reference, Some(custom));
        assert!(tree.group(group).is_empty());
    }

    #[test]
    fn test_missing_custom_file_warns() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let mut tree = FileTree::new(sandbox.root());
        let custom = tree.add_file("Config/Gone.xcconfig").unwrap();
        let group = tree.ensure_group("Pods").unwrap();
        let mut config = BuildConfiguration::new("Debug").with_base_configuration(custom);

        let outcome = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        assert!(outcome.warning().is_some());
        assert_eq!(config.base_configuration_reference, Some(custom));
    }

    #[test]
    fn test_unknown_configuration_is_fatal() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let mut tree = FileTree::new(sandbox.root());
        let group = tree.ensure_group("Pods").unwrap();
        let mut config = BuildConfiguration::new("Staging");

        let err = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BundleError>(),
            Some(BundleError::UnknownConfiguration { .. })
        ));
        assert!(config.base_configuration_reference.is_none());
        assert!(tree.group(group).is_empty());
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let mut tree = FileTree::new(sandbox.root());
        let group = tree.ensure_group("Pods").unwrap();
        let mut config = BuildConfiguration::new("Debug");

        let first = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();
        let second = link_configuration(&bundle, &mut tree, group, "App", &mut config).unwrap();

        assert!(first.is_mutation());
        assert_eq!(second, LinkOutcome::Unchanged);
        assert_eq!(tree.files().count(), 1);
    }
}
