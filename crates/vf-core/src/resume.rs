//! Where to resume the computation when the build order is already known

use crate::order::Group;
use crate::selection::{diff, Selection};
use serde::{Deserialize, Serialize};

/// First group to (re)compute after a selection change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePoint {
    /// Index of the first group to compute. Equal to the number of groups when nothing is left.
    pub group: usize,

    /// Whether every variable of that group must be recomputed,
    /// even those with a value in the current selection
    pub all_dirty: bool,
}

impl ResumePoint {
    /// Whether nothing is left to compute for a build order of `group_count` groups
    pub fn is_complete(&self, group_count: usize) -> bool {
        self.group >= group_count
    }
}

/// Find the group at which the computation must start again.
///
/// Groups are scanned in order. A variable without a current value stops the
/// scan at its own group. A changed variable stops it at the next group, which
/// must then be fully recomputed as it may depend on the changed value.
pub fn calculation_start_at(
    current: &Selection,
    previous: &Selection,
    groups: &[Group],
) -> ResumePoint {
    let changed = diff(current, previous);
    for (index, group) in groups.iter().enumerate() {
        let mut group_changed = false;
        for variable in &group.variables {
            if !current.contains_key(variable.as_str()) {
                return ResumePoint {
                    group: index,
                    all_dirty: false,
                };
            }
            group_changed |= changed.contains(variable.as_str());
        }
        if group_changed {
            return ResumePoint {
                group: index + 1,
                all_dirty: true,
            };
        }
    }
    ResumePoint {
        group: groups.len(),
        all_dirty: false,
    }
}

#[cfg(test)]
#[path = "resume_test.rs"]
mod tests;
