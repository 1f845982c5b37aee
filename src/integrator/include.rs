//! Detection of custom xcconfigs that already pull in the generated one.
//!
//! This is a line-based heuristic, not a preprocessor: transitive includes
//! are not followed and block comments are not understood.

use std::path::Path;

use regex::Regex;

use crate::util::fs::read_lossy;

/// A line equal to this marker silences the custom base configuration warning.
pub const SILENCE_WARNINGS_MARKER: &str = "// @COCOAPODS_SILENCE_WARNINGS@ //";

/// Matches lines that include a given xcconfig or carry the silence marker.
#[derive(Debug, Clone)]
pub struct IncludeMatcher {
    include: Regex,
}

impl IncludeMatcher {
    /// Build a matcher for `#include "<prefix/>TARGET_PATH"` lines.
    ///
    /// Leading whitespace and either quote style are accepted. Any prefix
    /// before the target path must end at a `/`.
    pub fn new(target_path: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r#"^\s*#include\s+['"](?:.*/)?{}['"]"#,
            regex::escape(target_path)
        );
        Ok(IncludeMatcher {
            include: Regex::new(&pattern)?,
        })
    }

    /// Check a single line.
    pub fn matches_line(&self, line: &str) -> bool {
        line.trim_end() == SILENCE_WARNINGS_MARKER || self.include.is_match(line)
    }

    /// Check whether any line matches.
    pub fn matches_lines<'a, I>(&self, lines: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines.into_iter().any(|line| self.matches_line(line))
    }
}

/// Check whether the xcconfig at `existing` includes `target_path` or is
/// explicitly silenced.
///
/// An absent path, a path that is not a regular file, and a read failure all
/// count as "does not include".
pub fn includes_target(existing: Option<&Path>, target_path: &str) -> bool {
    let Some(path) = existing else {
        return false;
    };
    if !path.is_file() {
        return false;
    }

    let contents = match read_lossy(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!("could not read {}: {:#}", path.display(), e);
            return false;
        }
    };

    match IncludeMatcher::new(target_path) {
        Ok(matcher) => matcher.matches_lines(contents.lines()),
        Err(e) => {
            tracing::debug!("invalid include pattern for `{}`: {}", target_path, e);
            false
        }
    }
}
