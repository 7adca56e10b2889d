//! Current/previous variable selections and their difference

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Map from variable name to its selected value
pub type Selection = HashMap<String, String>;

/// The selections of a dashboard view before and after a user change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Values currently selected
    #[serde(default)]
    pub current: Selection,

    /// Values selected before the last change
    #[serde(default)]
    pub previous: Selection,
}

impl SelectionState {
    /// Create a selection state from both snapshots
    pub fn new(current: Selection, previous: Selection) -> Self {
        Self { current, previous }
    }

    /// Names whose value differs between `previous` and `current`
    pub fn diff(&self) -> HashSet<String> {
        diff(&self.current, &self.previous)
    }

    /// Whether `name` has a value in `current`
    pub fn is_known(&self, name: &str) -> bool {
        self.current.contains_key(name)
    }
}

/// Names present in both maps with different values.
///
/// A name missing from either side is not part of the diff.
pub fn diff(current: &Selection, previous: &Selection) -> HashSet<String> {
    current
        .iter()
        .filter(|(name, value)| {
            previous
                .get(name.as_str())
                .is_some_and(|previous_value| previous_value != *value)
        })
        .map(|(name, _)| name.clone())
        .collect()
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
