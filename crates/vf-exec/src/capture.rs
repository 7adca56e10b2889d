//! Filtering of raw query values through a capturing regexp

use crate::error::{QueryError, QueryResult};
use regex::Regex;

/// Keep what the capturing groups of `pattern` match in `values`.
///
/// Every group of every match is collected, duplicates removed in first-seen
/// order. Values that do not match are dropped. Without a pattern the values
/// are returned as is.
pub fn capture_values(values: Vec<String>, pattern: Option<&str>) -> QueryResult<Vec<String>> {
    let Some(pattern) = pattern else {
        return Ok(values);
    };
    let regex = Regex::new(pattern).map_err(|e| QueryError::InvalidCapturingRegexp {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut captured: Vec<String> = Vec::new();
    for value in &values {
        for caps in regex.captures_iter(value) {
            for group in caps.iter().skip(1).flatten() {
                let text = group.as_str();
                if !captured.iter().any(|c| c == text) {
                    captured.push(text.to_string());
                }
            }
        }
    }
    Ok(captured)
}

#[cfg(test)]
#[path = "capture_test.rs"]
mod tests;
