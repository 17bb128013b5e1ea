//! Dependency ordering of generated entities
//!
//! Referenced entities are emitted before the entities that reference them. Entities
//! in a reference cycle keep their input order.

use crate::models::TargetEntityDefinition;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Indices of `definitions` in dependency order.
///
/// # Example
///
/// ```rust
/// use indexmap::IndexMap;
/// use schema_bridge::export::dependency_order;
/// use schema_bridge::models::TargetEntityDefinition;
///
/// let empty = |name: &str| TargetEntityDefinition {
///     name: name.to_string(),
///     table: name.to_lowercase(),
///     fields: IndexMap::new(),
///     primary_key: None,
///     skipped: Vec::new(),
/// };
/// assert_eq!(dependency_order(&[empty("A"), empty("B")]), vec![0, 1]);
/// ```
pub fn dependency_order(definitions: &[TargetEntityDefinition]) -> Vec<usize> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..definitions.len()).map(|i| graph.add_node(i)).collect();
    let by_name: HashMap<&str, NodeIndex> = definitions
        .iter()
        .zip(&nodes)
        .map(|(d, n)| (d.name.as_str(), *n))
        .collect();

    // Edges run from the referencing entity to the referenced one.
    for (definition, node) in definitions.iter().zip(&nodes) {
        for referenced in definition.referenced_entities() {
            if let Some(target) = by_name.get(referenced)
                && target != node
            {
                graph.add_edge(*node, *target, ());
            }
        }
    }

    // tarjan_scc yields components in reverse topological order: referenced first.
    tarjan_scc(&graph)
        .into_iter()
        .flat_map(|component| {
            let mut indices: Vec<usize> = component.into_iter().map(|n| graph[n]).collect();
            indices.sort_unstable();
            indices
        })
        .collect()
}
