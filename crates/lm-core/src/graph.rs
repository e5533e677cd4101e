//! Cross-package dependency graph
//!
//! SSIS projects chain packages through Execute Package tasks and order tasks
//! through precedence constraints. Both land here as directed edges so the
//! walk order and the `master -> … -> child` provenance strings can be
//! derived from one structure.

use crate::error::{CoreError, CoreResult};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet, VecDeque};

/// A directed graph of package (or task) dependencies
#[derive(Debug, Default)]
pub struct PackageGraph {
    /// The underlying graph
    graph: DiGraph<String, ()>,

    /// Map from node name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl PackageGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package node, returning the existing index if already present
    pub fn add_package(&mut self, name: &str) -> CoreResult<NodeIndex> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName {
                context: "package name in graph".into(),
            });
        }
        if let Some(&idx) = self.node_map.get(name) {
            Ok(idx)
        } else {
            let idx = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), idx);
            Ok(idx)
        }
    }

    /// Add an edge meaning `from` runs (or invokes) `to`
    pub fn add_link(&mut self, from: &str, to: &str) -> CoreResult<()> {
        let from_idx = self.add_package(from)?;
        let to_idx = self.add_package(to)?;
        self.graph.update_edge(from_idx, to_idx, ());
        Ok(())
    }

    /// Number of packages in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// True when no packages have been added
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Direct children of a package (what it invokes next)
    pub fn children(&self, name: &str) -> Vec<String> {
        if let Some(&idx) = self.node_map.get(name) {
            self.graph
                .edges_directed(idx, petgraph::Direction::Outgoing)
                .map(|e| self.graph[e.target()].clone())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Direct parents of a package (what invokes it)
    pub fn parents(&self, name: &str) -> Vec<String> {
        if let Some(&idx) = self.node_map.get(name) {
            self.graph
                .edges_directed(idx, petgraph::Direction::Incoming)
                .map(|e| self.graph[e.source()].clone())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Shortest invocation path from one package to another, both inclusive
    pub fn path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let &start = self.node_map.get(from)?;
        let &goal = self.node_map.get(to)?;

        if start == goal {
            return Some(vec![self.graph[start].clone()]);
        }

        // Plain BFS; edge weights carry no meaning here
        let mut predecessor: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for edge in self.graph.edges(current) {
                let next = edge.target();
                if visited.insert(next) {
                    predecessor.insert(next, current);
                    if next == goal {
                        let mut path = vec![goal];
                        let mut node = goal;
                        while let Some(&prev) = predecessor.get(&node) {
                            path.push(prev);
                            node = prev;
                        }
                        path.reverse();
                        return Some(path.into_iter().map(|i| self.graph[i].clone()).collect());
                    }
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// Render the path from a master package down to a child as
    /// `project -> master -> … -> child`. The master itself is not repeated
    /// inside the tail. An unreachable child renders as `project -> master -> `.
    pub fn dependency_path(&self, project: &str, master: &str, child: &str) -> String {
        let tail = match self.path(master, child) {
            Some(path) => path
                .into_iter()
                .skip_while(|p| p.as_str() == master)
                .collect::<Vec<_>>()
                .join(" -> "),
            None => String::new(),
        };
        format!("{} -> {} -> {}", project, master, tail)
    }

    /// Report one cycle as `a -> b -> a`, if any exists
    pub fn find_cycle(&self) -> Option<String> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(_) => None,
            Err(cycle) => {
                let start = cycle.node_id();
                let mut path: Vec<String> = vec![self.graph[start].clone()];
                let mut current = start;
                let mut visited = HashSet::new();
                visited.insert(current);

                while let Some(edge) = self.graph.edges(current).next() {
                    let target = edge.target();
                    path.push(self.graph[target].clone());
                    if target == start || visited.contains(&target) {
                        break;
                    }
                    visited.insert(target);
                    current = target;
                }

                Some(path.join(" -> "))
            }
        }
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
