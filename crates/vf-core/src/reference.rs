//! Extraction and substitution of `$name` variable references

use crate::variable::VariableParameter;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Pattern every variable name must match
pub const VARIABLE_NAME_PATTERN: &str = "^[a-zA-Z0-9_-]+$";

/// Pattern of a reference to another variable inside a parameter text
pub const VARIABLE_REFERENCE_PATTERN: &str = r"\$([a-zA-Z0-9_-]+)";

fn name_regex() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(VARIABLE_NAME_PATTERN).expect("valid regex literal"))
}

fn reference_regex() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| Regex::new(VARIABLE_REFERENCE_PATTERN).expect("valid regex literal"))
}

/// Check a name against [`VARIABLE_NAME_PATTERN`]
pub fn is_valid_variable_name(name: &str) -> bool {
    name_regex().is_match(name)
}

/// Iterate over the names referenced in `text`, duplicates included
pub fn find_references(text: &str) -> impl Iterator<Item = &str> {
    reference_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Names referenced by a parameter, in first-appearance order, without duplicates.
///
/// Scans the expression, the label name and every matcher. Constants reference nothing.
pub fn referenced_variables(parameter: &VariableParameter) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for text in parameter.texts() {
        for name in find_references(text) {
            if !result.iter().any(|seen| seen == name) {
                result.push(name.to_string());
            }
        }
    }
    result
}

/// Replace each `$name` token that has a value in `selection`.
///
/// Tokens are matched whole, so a value for `foo` never rewrites `$foobar`.
/// Tokens without a value are kept as written.
pub fn substitute(text: &str, selection: &HashMap<String, String>) -> String {
    if selection.is_empty() {
        return text.to_string();
    }
    reference_regex()
        .replace_all(text, |caps: &Captures<'_>| match selection.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
#[path = "reference_test.rs"]
mod tests;
