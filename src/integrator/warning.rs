//! Non-fatal findings of an integration pass.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::integrator::include::SILENCE_WARNINGS_MARKER;
use crate::util::diagnostic::Diagnostic;

/// A situation the integrator will not resolve on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum XcconfigWarning {
    /// The configuration's base configuration is a user file outside the
    /// sandbox that does not include the generated xcconfig.
    CustomBaseConfiguration {
        target: String,
        configuration: String,
        xcconfig_path: String,
        existing_path: PathBuf,
    },

    /// The configuration sets a build setting the generated xcconfig also
    /// sets, without `$(inherited)`.
    BuildSettingOverride {
        target: String,
        configuration: String,
        setting: String,
        xcconfig_path: String,
    },
}

impl XcconfigWarning {
    /// Name of the affected target.
    pub fn target(&self) -> &str {
        match self {
            XcconfigWarning::CustomBaseConfiguration { target, .. }
            | XcconfigWarning::BuildSettingOverride { target, .. } => target,
        }
    }

    /// Name of the affected build configuration.
    pub fn configuration(&self) -> &str {
        match self {
            XcconfigWarning::CustomBaseConfiguration { configuration, .. }
            | XcconfigWarning::BuildSettingOverride { configuration, .. } => configuration,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            XcconfigWarning::CustomBaseConfiguration {
                target,
                xcconfig_path,
                existing_path,
                ..
            } => Diagnostic::warning(self.to_string())
                .with_location(existing_path.clone())
                .with_context(format!("generated xcconfig: {}", xcconfig_path))
                .with_context("the pods will not be linked until this is resolved")
                .with_suggestion(format!(
                    "Set the base configuration of target `{}` to `{}`",
                    target, xcconfig_path
                ))
                .with_suggestion(format!(
                    "Add `#include \"{}\"` to {}",
                    xcconfig_path,
                    existing_path.display()
                ))
                .with_suggestion(format!(
                    "Add the line `{}` to {} to keep it as is",
                    SILENCE_WARNINGS_MARKER,
                    existing_path.display()
                )),

            XcconfigWarning::BuildSettingOverride { .. } => {
                Diagnostic::warning(self.to_string())
                    .with_context("this can lead to problems with the pods integration")
                    .with_suggestion("Use the `$(inherited)` flag")
                    .with_suggestion("Remove the build setting from the target")
            }
        }
    }
}

impl fmt::Display for XcconfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XcconfigWarning::CustomBaseConfiguration {
                target,
                configuration,
                existing_path,
                ..
            } => write!(
                f,
                "base configuration of `{} [{}]` was not set because it already uses a custom config ({})",
                target,
                configuration,
                existing_path.display()
            ),
            XcconfigWarning::BuildSettingOverride {
                target,
                configuration,
                setting,
                xcconfig_path,
            } => write!(
                f,
                "the `{} [{}]` target overrides the `{}` build setting defined in `{}`",
                target, configuration, setting, xcconfig_path
            ),
        }
    }
}
