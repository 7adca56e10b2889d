//! Build order of the variables, grouped in waves
//!
//! For example we could have:
//!
//! ```text
//!        (f)         (d)
//!       / | \         |
//!     (c) |  (b)     (g)
//!      \  |  /|
//!        (a)  /
//!         |  /
//!         | /
//!        (e)
//! ```
//!
//! (f) and (d) have no incoming edge, so they are built first and in parallel.
//! Their outgoing edges are then dropped, which frees (c), (b) and (g), and so on:
//!
//! ```text
//! group0: (f), (d)
//! group1: (c), (b), (g)
//! group2: (a)
//! group3: (e)
//! ```

use crate::error::{CoreError, CoreResult};
use crate::graph::VariableGraph;
use crate::selection::SelectionState;
use crate::variable::VariableSet;
use crate::variable_name::VariableName;
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A set of variables that can be built in parallel.
///
/// The order of `variables` inside a group carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub variables: Vec<VariableName>,
}

impl Group {
    /// Whether the group holds `name`
    pub fn contains(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v == name)
    }
}

/// Full build order of `variables`
pub fn build_order(variables: &VariableSet) -> CoreResult<Vec<Group>> {
    VariableGraph::build(variables)?.build_order()
}

/// Build order restricted to the variables that must be (re)computed given `selection`
pub fn build_order_with_selection(
    variables: &VariableSet,
    selection: &SelectionState,
) -> CoreResult<Vec<Group>> {
    let mut graph = VariableGraph::build(variables)?;
    graph.shake(selection);
    graph.build_order()
}

impl VariableGraph {
    /// Consume the graph and compute its build order.
    ///
    /// Fails with [`CoreError::CircularDependency`] when some variables can never
    /// reach zero unresolved dependencies. No partial order is returned then.
    pub fn build_order(mut self) -> CoreResult<Vec<Group>> {
        let mut remaining: Vec<NodeIndex> = self.graph.node_indices().collect();
        let mut groups = Vec::new();

        while !remaining.is_empty() {
            let (ready, blocked): (Vec<NodeIndex>, Vec<NodeIndex>) = remaining
                .into_iter()
                .partition(|&idx| self.graph[idx].dependencies == 0);

            if ready.is_empty() {
                return Err(CoreError::CircularDependency {
                    cycle: self.find_cycle_path(&blocked),
                });
            }

            for &idx in &ready {
                for child in self.children(idx) {
                    self.graph[child].dependencies -= 1;
                }
            }

            groups.push(Group {
                variables: ready
                    .iter()
                    .map(|&idx| self.graph[idx].name.clone())
                    .collect(),
            });
            remaining = blocked;
        }

        log::debug!("Variable build order has {} group(s)", groups.len());
        Ok(groups)
    }

    /// Walk unresolved parents from a blocked node until one repeats.
    ///
    /// Every blocked node still has a blocked parent, so the walk always closes a cycle.
    fn find_cycle_path(&self, blocked: &[NodeIndex]) -> String {
        let Some(&start) = blocked.first() else {
            return String::new();
        };
        let blocked_set: HashSet<NodeIndex> = blocked.iter().copied().collect();

        let mut path = vec![start];
        let mut current = start;
        loop {
            let parent = self
                .graph
                .neighbors_directed(current, Direction::Incoming)
                .find(|p| blocked_set.contains(p));
            let Some(parent) = parent else {
                break;
            };
            if let Some(pos) = path.iter().position(|&idx| idx == parent) {
                // path[pos..] was walked against the edges; flip it and close the loop.
                let mut cycle: Vec<NodeIndex> = path.split_off(pos);
                cycle.reverse();
                cycle.push(cycle[0]);
                path = cycle;
                break;
            }
            path.push(parent);
            current = parent;
        }

        path.iter()
            .map(|&idx| self.graph[idx].name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
#[path = "order_test.rs"]
mod tests;
