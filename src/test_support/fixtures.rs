//! Shared fixtures.

use crate::core::{BuildConfiguration, Target};

/// A generated xcconfig as the dependency manager writes it.
pub const GENERATED_XCCONFIG: &str = r#"GCC_PREPROCESSOR_DEFINITIONS = $(inherited) COCOAPODS=1
HEADER_SEARCH_PATHS = $(inherited) "${PODS_ROOT}/Headers/Public"
OTHER_LDFLAGS = $(inherited) -ObjC -l"Pods-App"
PODS_BUILD_DIR = ${BUILD_DIR}
PODS_ROOT = ${SRCROOT}/Pods
"#;

/// Target `App` with bare configurations of the given names.
pub fn app_target(configurations: &[&str]) -> Target {
    configurations
        .iter()
        .fold(Target::new("App"), |target, name| {
            target.with_configuration(BuildConfiguration::new(*name))
        })
}
