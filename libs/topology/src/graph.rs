//! Explicit reference graph over a stack's resources.
//!
//! Provisioning platforms need resources in dependency order. Rather
//! than leaving that ordering implicit in declaration order, the graph
//! makes every edge explicit and derives the order with a topological
//! sort, using declaration order as the tie-break so the result is
//! deterministic.

use std::collections::BTreeMap;

use crate::error::TopologyError;
use crate::stack::Stack;

/// A directed acyclic graph of resource dependencies.
///
/// Nodes are canonical resource keys; an edge `a → b` means `a` must be
/// provisioned before `b`.
#[derive(Debug, Clone)]
pub struct ReferenceGraph {
    /// Keys in declaration order.
    nodes: Vec<String>,

    /// Node key -> keys it depends on.
    dependencies: BTreeMap<String, Vec<String>>,
}

impl ReferenceGraph {
    /// Builds the graph from a stack's declared references.
    pub fn from_stack(stack: &Stack) -> Self {
        let mut nodes = Vec::with_capacity(stack.resources().len());
        let mut dependencies = BTreeMap::new();

        for resource in stack.resources() {
            let key = resource.key();
            dependencies.insert(key.clone(), resource.depends_on());
            nodes.push(key);
        }

        Self {
            nodes,
            dependencies,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dependencies of a node, if it exists.
    pub fn dependencies(&self, key: &str) -> Option<&[String]> {
        self.dependencies.get(key).map(|deps| deps.as_slice())
    }

    /// Keys in an order where every dependency precedes its dependents.
    ///
    /// Kahn's algorithm with declaration order as the tie-break: among
    /// the ready nodes, the earliest-declared is emitted first. A stack
    /// built through `add_*` therefore sorts to exactly its declaration
    /// order. Remaining nodes after exhaustion form a cycle and are
    /// reported as an error.
    pub fn provisioning_order(&self) -> Result<Vec<String>, TopologyError> {
        let position: BTreeMap<&str, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), i))
            .collect();

        let mut indegree: Vec<usize> = vec![0; self.nodes.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];

        for (key, deps) in &self.dependencies {
            let node = position[key.as_str()];
            for dep in deps {
                // Unknown keys cannot occur for graphs built from a
                // stack; skip rather than panic for hand-built graphs.
                let Some(&dep_node) = position.get(dep.as_str()) else {
                    continue;
                };
                indegree[node] += 1;
                dependents[dep_node].push(node);
            }
        }

        let mut ready: std::collections::BTreeSet<usize> = indegree
            .iter()
            .enumerate()
            .filter(|(_, &deg)| deg == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(&next) = ready.iter().next() {
            ready.remove(&next);
            order.push(self.nodes[next].clone());

            for &dependent in &dependents[next] {
                indegree[dependent] -= 1;
                if indegree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() != self.nodes.len() {
            let members = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(i, _)| indegree[*i] > 0)
                .map(|(_, key)| key.clone())
                .collect();
            return Err(TopologyError::DependencyCycle { members });
        }

        Ok(order)
    }
}
