use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use skillgraph_core::{validate_collection, RefResolver, SkillRecord};
use skillgraph_vault::{scan, CancelFlag, VaultAdapter};

use crate::adjacency::{export_adjacency, AdjacencyEntry, AdjacencyOptions};
use crate::builder::build_nodes_and_edges;
use crate::condense::{condense, CycleInfo};
use crate::edge::GraphEdge;
use crate::node::GraphNode;

/// Host-supplied configuration for one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub condense_cycles: bool,
    pub adjacency: AdjacencyOptions,
    /// Layout hints for downstream consumers; passed through unchanged.
    pub dense_threshold: Option<u64>,
    pub density_threshold: Option<f64>,
    pub cancel: CancelFlag,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            condense_cycles: true,
            adjacency: AdjacencyOptions::default(),
            dense_threshold: None,
            density_threshold: None,
            cancel: CancelFlag::default(),
        }
    }
}

/// Counters and pass-through hints accompanying the exported graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMeta {
    pub node_count: usize,
    pub edge_count: usize,
    pub cycle_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dense_threshold: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_threshold: Option<f64>,
}

/// The stable output schema: sorted nodes and edges, kind-grouped adjacency
/// both post- and pre-condensation, the condensed cycle list, and counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphOutput {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub adjacency: BTreeMap<String, AdjacencyEntry>,
    pub raw_adjacency: BTreeMap<String, AdjacencyEntry>,
    pub cycles: Vec<CycleInfo>,
    pub meta: GraphMeta,
}

/// Scan a vault through the adapter and build the full graph artifact.
///
/// Never fails: adapter problems surface as an empty or partial graph, and
/// input defects become warnings logged here and ghost nodes in the output.
pub async fn build_graph(adapter: &dyn VaultAdapter, options: &BuildOptions) -> GraphOutput {
    let docs = scan(adapter, &options.cancel).await;
    let pairs: Vec<(String, String)> = docs.into_iter().map(|d| (d.rel_path, d.text)).collect();

    let outcomes = validate_collection(&pairs);
    for outcome in &outcomes {
        for message in outcome.errors.iter().chain(outcome.warnings.iter()) {
            warn!(path = %outcome.record.source_path, "{message}");
        }
    }

    let records: Vec<SkillRecord> = outcomes.into_iter().map(|o| o.record).collect();
    build_graph_from_records(&records, options)
}

/// Pure variant for hosts that already hold parsed records, and for tests.
pub fn build_graph_from_records(records: &[SkillRecord], options: &BuildOptions) -> GraphOutput {
    let resolver = RefResolver::new(records);
    let (raw_nodes, raw_edges) = build_nodes_and_edges(records, &resolver);

    let raw_adjacency = export_adjacency(&raw_nodes, &raw_edges, options.adjacency);

    let (nodes, edges, cycles) = if options.condense_cycles {
        condense(&raw_nodes, &raw_edges)
    } else {
        (raw_nodes, raw_edges, Vec::new())
    };

    let adjacency = export_adjacency(&nodes, &edges, options.adjacency);

    let mut nodes: Vec<GraphNode> = nodes.into_values().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    let mut edges = edges;
    edges.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let meta = GraphMeta {
        node_count: nodes.len(),
        edge_count: edges.len(),
        cycle_count: cycles.len(),
        dense_threshold: options.dense_threshold,
        density_threshold: options.density_threshold,
    };

    GraphOutput {
        nodes,
        edges,
        adjacency,
        raw_adjacency,
        cycles,
        meta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_builds_empty_output() {
        let output = build_graph_from_records(&[], &BuildOptions::default());
        assert!(output.nodes.is_empty());
        assert!(output.edges.is_empty());
        assert!(output.cycles.is_empty());
        assert!(output.adjacency.is_empty());
        assert_eq!(output.meta.node_count, 0);
        assert_eq!(output.meta.edge_count, 0);
        assert_eq!(output.meta.cycle_count, 0);
    }

    #[test]
    fn layout_hints_pass_through() {
        let options = BuildOptions {
            dense_threshold: Some(150),
            density_threshold: Some(2.5),
            ..BuildOptions::default()
        };
        let output = build_graph_from_records(&[], &options);
        assert_eq!(output.meta.dense_threshold, Some(150));
        assert_eq!(output.meta.density_threshold, Some(2.5));
    }
}
