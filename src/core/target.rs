//! User targets and their build configurations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::project::FileRefId;

/// A named build configuration (`Debug`, `Release`, ...) of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    /// Configuration name
    pub name: String,

    /// File the configuration inherits its default settings from
    #[serde(
        default,
        rename = "base_configuration",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_configuration_reference: Option<FileRefId>,

    /// Build settings set directly on the configuration
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub build_settings: BTreeMap<String, String>,
}

impl BuildConfiguration {
    /// Create a configuration with no base configuration and no settings.
    pub fn new(name: impl Into<String>) -> Self {
        BuildConfiguration {
            name: name.into(),
            base_configuration_reference: None,
            build_settings: BTreeMap::new(),
        }
    }

    /// Set the base configuration reference.
    pub fn with_base_configuration(mut self, reference: FileRefId) -> Self {
        self.base_configuration_reference = Some(reference);
        self
    }

    /// Add a build setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.build_settings.insert(key.into(), value.into());
        self
    }
}

/// A user build unit with an ordered set of configurations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target name
    pub name: String,

    /// Build configurations, in project order
    #[serde(default, rename = "configuration")]
    pub configurations: Vec<BuildConfiguration>,
}

impl Target {
    /// Create a target without configurations.
    pub fn new(name: impl Into<String>) -> Self {
        Target {
            name: name.into(),
            configurations: Vec::new(),
        }
    }

    /// Add a configuration.
    pub fn with_configuration(mut self, config: BuildConfiguration) -> Self {
        self.configurations.push(config);
        self
    }

    /// Find a configuration by name.
    pub fn configuration(&self, name: &str) -> Option<&BuildConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }
}
