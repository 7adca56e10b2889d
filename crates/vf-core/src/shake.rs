//! Shaking: drop from the graph the variables whose value is already known
//!
//! A node can be dropped when it has no unresolved dependency, nothing upstream
//! forced it to be recomputed (`keep`), and its value is either known in the
//! current selection or just changed by the user. Dropping a changed node marks
//! its children with `keep`, since their values were computed from the old one.
//!
//! ```text
//! (a) (b)
//!   \ /
//!   (c)
//! ```
//!
//! With a value for a, b and c, and a change of a: a and b are dropped, c is
//! marked and stays, as it must be recomputed from the new value of a.

use crate::graph::VariableGraph;
use crate::selection::SelectionState;
use petgraph::stable_graph::NodeIndex;

impl VariableGraph {
    /// Remove the variables that need no computation for this `selection`.
    ///
    /// A variable absent from `selection.current` is never removed, even once all
    /// of its dependencies are. The remaining graph is the plan to schedule.
    pub fn shake(&mut self, selection: &SelectionState) {
        let diff = selection.diff();
        let before = self.len();

        loop {
            let removable: Vec<(NodeIndex, bool)> = self
                .graph
                .node_indices()
                .filter_map(|idx| {
                    let node = &self.graph[idx];
                    if node.dependencies != 0 || node.keep {
                        return None;
                    }
                    let changed = diff.contains(node.name.as_str());
                    (changed || selection.is_known(&node.name)).then_some((idx, changed))
                })
                .collect();

            if removable.is_empty() {
                break;
            }

            for (idx, changed) in removable {
                for child in self.children(idx) {
                    let child = &mut self.graph[child];
                    child.dependencies -= 1;
                    child.keep |= changed;
                }
                self.remove(idx);
            }
        }

        log::debug!(
            "Shaking removed {} of {} variable(s)",
            before - self.len(),
            before
        );
    }
}

#[cfg(test)]
#[path = "shake_test.rs"]
mod tests;
