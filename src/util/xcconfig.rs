//! Minimal reader for `.xcconfig` build setting files.
//!
//! Only what the integrator needs: the set of settings a file defines.
//! `#include` lines are skipped and values are kept verbatim; variable
//! expansion is not performed.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::util::fs::read_lossy;

/// The settings declared by one xcconfig file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Xcconfig {
    /// Build settings keyed by their base name (conditions stripped)
    settings: BTreeMap<String, String>,
}

impl Xcconfig {
    /// Parse xcconfig source text.
    pub fn parse(source: &str) -> Self {
        let mut xcconfig = Xcconfig::default();

        for raw in source.lines() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with("#include") {
                continue;
            }

            if let Some((key, value)) = split_assignment(line) {
                let key = base_key(key.trim());
                if key.is_empty() {
                    continue;
                }
                xcconfig
                    .settings
                    .insert(key.to_string(), value.trim().to_string());
            }
        }

        xcconfig
    }

    /// Load and parse an xcconfig file.
    pub fn load(path: &Path) -> Result<Self> {
        let source =
            read_lossy(path).with_context(|| format!("failed to read xcconfig: {}", path.display()))?;
        Ok(Self::parse(&source))
    }

    /// Check whether the file defines a setting.
    pub fn contains(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    /// All settings, sorted by key.
    pub fn settings(&self) -> &BTreeMap<String, String> {
        &self.settings
    }
}

/// Check whether a setting value chains to the inherited value.
pub fn inherits(value: &str) -> bool {
    value.contains("$(inherited)") || value.contains("${inherited}")
}

/// Cut a trailing `//` comment; `//` inside a quoted value is kept.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut quote = None;
    for (idx, &b) in bytes.iter().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'/') if bytes.get(idx + 1) == Some(&b'/') => return &line[..idx],
            _ => {}
        }
    }
    line
}

/// Split `KEY[cond=x] = value` at the first `=` outside of brackets.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (idx, ch) in line.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => return Some((&line[..idx], &line[idx + 1..])),
            _ => {}
        }
    }
    None
}

/// `OTHER_LDFLAGS[sdk=iphoneos*]` -> `OTHER_LDFLAGS`
fn base_key(key: &str) -> &str {
    match key.find('[') {
        Some(idx) => key[..idx].trim_end(),
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings_skips_includes() {
        let xcconfig = Xcconfig::parse(
            r#"
// Generated
#include "Pods/Target Support Files/Pods/Pods.debug.xcconfig"
#include? 'Local.xcconfig'
OTHER_LDFLAGS = $(inherited) -ObjC // linker
GCC_PREPROCESSOR_DEFINITIONS[config=Debug] = DEBUG=1
PODS_ROOT = ${SRCROOT}/Pods
"#,
        );

        let settings = xcconfig.settings();
        assert_eq!(settings["OTHER_LDFLAGS"], "$(inherited) -ObjC");
        assert_eq!(settings["GCC_PREPROCESSOR_DEFINITIONS"], "DEBUG=1");
        assert_eq!(settings["PODS_ROOT"], "${SRCROOT}/Pods");
        assert_eq!(settings.len(), 3);
    }

    #[test]
    fn test_comment_marker_inside_quotes_is_kept() {
        let xcconfig = Xcconfig::parse(
            "URL = \"https://host/x\" // mirror\nPATHS = '//server/share' \"a\"\nPLAIN = https://host/y\n",
        );

        let settings = xcconfig.settings();
        assert_eq!(settings["URL"], "\"https://host/x\"");
        assert_eq!(settings["PATHS"], "'//server/share' \"a\"");
        // Unquoted `//` still starts a comment
        assert_eq!(settings["PLAIN"], "https:");
        assert!(xcconfig.contains("URL"));
    }

    #[test]
    fn test_inherits() {
        assert!(inherits("$(inherited) -lz"));
        assert!(inherits("${inherited}"));
        assert!(!inherits("-lz"));
    }
}
