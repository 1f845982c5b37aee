//! Warnings for build settings that shadow generated ones.

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::{debug, warn};

use crate::core::{BuildConfiguration, PodBundle};
use crate::integrator::warning::XcconfigWarning;
use crate::util::xcconfig::{inherits, Xcconfig};

/// Keys set in `settings` that `xcconfig` also sets, without `$(inherited)`.
pub fn overridden_settings<'a>(
    xcconfig: &Xcconfig,
    settings: &'a BTreeMap<String, String>,
) -> Vec<&'a str> {
    settings
        .iter()
        .filter(|(key, value)| xcconfig.contains(key) && !inherits(value))
        .map(|(key, _)| key.as_str())
        .collect()
}

/// Check one configuration against its generated xcconfig.
///
/// Skipped (no warnings) when the generated xcconfig does not exist yet or
/// cannot be read.
pub fn check_overrides(
    bundle: &PodBundle,
    target_name: &str,
    config: &BuildConfiguration,
) -> Result<Vec<XcconfigWarning>> {
    let xcconfig_file = bundle.xcconfig_path(&config.name)?;
    if !xcconfig_file.is_file() {
        debug!(
            "{} [{}]: {} not generated yet, skipping override check",
            target_name,
            config.name,
            xcconfig_file.display()
        );
        return Ok(Vec::new());
    }

    let xcconfig = match Xcconfig::load(&xcconfig_file) {
        Ok(xcconfig) => xcconfig,
        Err(e) => {
            warn!(
                "{} [{}]: skipping override check: {:#}",
                target_name, config.name, e
            );
            return Ok(Vec::new());
        }
    };
    let xcconfig_path = bundle.xcconfig_relative_path(&config.name)?;

    Ok(overridden_settings(&xcconfig, &config.build_settings)
        .into_iter()
        .map(|setting| XcconfigWarning::BuildSettingOverride {
            target: target_name.to_string(),
            configuration: config.name.clone(),
            setting: setting.to_string(),
            xcconfig_path: xcconfig_path.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestSandbox, GENERATED_XCCONFIG};

    #[test]
    fn test_overridden_settings() {
        let xcconfig = Xcconfig::parse(GENERATED_XCCONFIG);
        let mut settings = BTreeMap::new();
        settings.insert("OTHER_LDFLAGS".to_string(), "-lz".to_string());
        settings.insert("HEADER_SEARCH_PATHS".to_string(), "$(inherited) include".to_string());
        settings.insert("SWIFT_VERSION".to_string(), "5.0".to_string());

        assert_eq!(overridden_settings(&xcconfig, &settings), vec!["OTHER_LDFLAGS"]);
    }

    #[test]
    fn test_check_overrides_reads_generated_xcconfig() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        sandbox.write("Pods/Pods.debug.xcconfig", GENERATED_XCCONFIG);
        let config = BuildConfiguration::new("Debug")
            .with_setting("OTHER_LDFLAGS", "-ObjC")
            .with_setting("PODS_ROOT", "${inherited}");

        let warnings = check_overrides(&bundle, "App", &config).unwrap();

        assert_eq!(
            warnings,
            vec![XcconfigWarning::BuildSettingOverride {
                target: "App".to_string(),
                configuration: "Debug".to_string(),
                setting: "OTHER_LDFLAGS".to_string(),
                xcconfig_path: "Pods/Pods.debug.xcconfig".to_string(),
            }]
        );
    }

    #[test]
    fn test_check_overrides_reads_non_utf8_xcconfig() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let path = sandbox.root().join("Pods/Pods.release.xcconfig");
        std::fs::write(&path, b"// \xE9\nOTHER_LDFLAGS = -ObjC\n").unwrap();
        let config = BuildConfiguration::new("Release").with_setting("OTHER_LDFLAGS", "-lz");

        let warnings = check_overrides(&bundle, "App", &config).unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            XcconfigWarning::BuildSettingOverride { setting, .. } if setting == "OTHER_LDFLAGS"
        ));
    }

    #[test]
    fn test_check_overrides_skips_missing_xcconfig() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let config = BuildConfiguration::new("Release").with_setting("OTHER_LDFLAGS", "-ObjC");

        assert!(check_overrides(&bundle, "App", &config).unwrap().is_empty());
    }

    #[test]
    fn test_check_overrides_unknown_configuration() {
        let sandbox = TestSandbox::new();
        let bundle = sandbox.bundle();
        let config = BuildConfiguration::new("Staging");

        assert!(check_overrides(&bundle, "App", &config).is_err());
    }
}
