//! Input discovery: expand glob patterns into a sorted file list.

use crate::Result;

use anyhow::Context;
use glob::MatchOptions;
use tracing::debug;

/// Expand every pattern and return all matches sorted lexicographically.
///
/// A pattern matching nothing contributes nothing. Duplicates are kept, so a file
/// matched by two patterns is processed twice. Wildcards do not match a leading
/// `.`, so hidden files are only picked up when named explicitly.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<String>> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let mut files = Vec::new();
    for pattern in patterns {
        let before = files.len();
        let paths = glob::glob_with(pattern, options)
            .with_context(|| format!("invalid input pattern {}", pattern))?;
        for entry in paths {
            let path = entry.with_context(|| format!("expand input pattern {}", pattern))?;
            files.push(path.to_string_lossy().into_owned());
        }
        debug!(pattern = %pattern, matched = files.len() - before, "expanded input");
    }
    files.sort();
    Ok(files)
}
