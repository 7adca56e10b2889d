//! Dependency graph of dashboard variables
//!
//! Each variable is a node; an edge goes from a dependency to the variable that
//! references it. Every node also carries the number of dependencies that are
//! not resolved yet, which the scheduler and the shaking pass consume.

use crate::error::{CoreError, CoreResult};
use crate::reference::referenced_variables;
use crate::variable::VariableSet;
use crate::variable_name::VariableName;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

/// Map from a variable to the variables it references
pub type Dependencies = BTreeMap<VariableName, Vec<VariableName>>;

/// A node of the variable graph
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) name: VariableName,
    /// Number of incoming edges not resolved yet. The variable can be built once it drops to 0.
    pub(crate) dependencies: usize,
    /// Set by shaking when an ancestor changed: the node must be recomputed
    /// even if its value is known.
    pub(crate) keep: bool,
}

/// Directed graph of variable dependencies
#[derive(Debug, Clone)]
pub struct VariableGraph {
    pub(crate) graph: StableDiGraph<Node, ()>,
    pub(crate) node_map: HashMap<VariableName, NodeIndex>,
}

impl VariableGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Validate names, extract references and build the graph of `variables`
    pub fn build(variables: &VariableSet) -> CoreResult<Self> {
        let deps = build_variable_dependencies(variables)?;
        Self::from_dependencies(&deps)
    }

    /// Build the graph from an already computed dependency map.
    ///
    /// Every key becomes a node; every referenced name must be a key as well.
    pub fn from_dependencies(dependencies: &Dependencies) -> CoreResult<Self> {
        let mut graph = Self::new();
        for name in dependencies.keys() {
            graph.add_variable(name.clone());
        }
        for (variable, deps) in dependencies {
            for dep in deps {
                graph.add_edge(dep, variable)?;
            }
        }
        Ok(graph)
    }

    /// Add a variable node, returning the existing one if already present
    pub fn add_variable(&mut self, name: VariableName) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&name) {
            return idx;
        }
        let idx = self.graph.add_node(Node {
            name: name.clone(),
            dependencies: 0,
            keep: false,
        });
        self.node_map.insert(name, idx);
        idx
    }

    /// Register `dependent` as a child of `dependency`.
    ///
    /// Adding the same edge twice is a no-op, so repeated references count once.
    pub fn add_edge(&mut self, dependency: &str, dependent: &str) -> CoreResult<()> {
        let (Some(&from), Some(&to)) = (self.node_map.get(dependency), self.node_map.get(dependent))
        else {
            return Err(CoreError::UndefinedVariable {
                name: dependency.to_string(),
                used_by: dependent.to_string(),
            });
        };
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, ());
            self.graph[to].dependencies += 1;
        }
        Ok(())
    }

    /// Number of variables in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph holds no variable
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Check if a variable is in the graph
    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// All variable names, in insertion order
    pub fn variables(&self) -> Vec<VariableName> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].name.clone())
            .collect()
    }

    /// Direct dependents (children) of a variable
    pub fn dependents(&self, name: &str) -> Vec<VariableName> {
        let Some(&idx) = self.node_map.get(name) else {
            return Vec::new();
        };
        let mut children: Vec<VariableName> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|child| self.graph[child].name.clone())
            .collect();
        children.sort();
        children
    }

    /// Number of unresolved dependencies of a variable
    pub fn remaining_dependencies(&self, name: &str) -> Option<usize> {
        self.node_map
            .get(name)
            .map(|&idx| self.graph[idx].dependencies)
    }

    pub(crate) fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors_directed(idx, Direction::Outgoing).collect()
    }

    pub(crate) fn remove(&mut self, idx: NodeIndex) {
        if let Some(node) = self.graph.remove_node(idx) {
            self.node_map.remove(&node.name);
        }
    }
}

impl Default for VariableGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute, for every variable, the variables it references.
///
/// All names are validated first. Then every reference must point to a
/// variable of the set, otherwise the whole computation fails.
pub fn build_variable_dependencies(variables: &VariableSet) -> CoreResult<Dependencies> {
    let names = variables
        .keys()
        .map(|name| VariableName::parse(name.as_str()))
        .collect::<CoreResult<Vec<_>>>()?;

    let mut result = Dependencies::new();
    for (name, variable) in names.into_iter().zip(variables.values()) {
        let mut deps = Vec::new();
        for referenced in referenced_variables(&variable.parameter) {
            if !variables.contains_key(&referenced) {
                return Err(CoreError::UndefinedVariable {
                    name: referenced,
                    used_by: name.into_inner(),
                });
            }
            deps.push(VariableName::parse(referenced)?);
        }
        result.insert(name, deps);
    }
    Ok(result)
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
