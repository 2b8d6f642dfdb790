use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::edge::{EdgeKind, GraphEdge};
use crate::node::{GraphNode, NodeKind};

/// Which synthetic node ids appear as keys in the exported adjacency. The
/// default keyset is real document nodes only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjacencyOptions {
    pub include_ghost: bool,
    pub include_scripts: bool,
    pub include_cycles: bool,
}

/// Per-node neighbor view grouped by edge kind. `all` is the union of the
/// three kind lists; every list is sorted and distinct. Empty lists are
/// retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    pub all: Vec<String>,
    pub wiki: Vec<String>,
    pub related: Vec<String>,
    pub scripts: Vec<String>,
}

/// Emit the id → neighbor-view mapping for a graph. Keys come out in sorted
/// order (the map is ordered); targets inside the lists are not filtered by
/// the option flags.
pub fn export_adjacency(
    nodes: &BTreeMap<String, GraphNode>,
    edges: &[GraphEdge],
    options: AdjacencyOptions,
) -> BTreeMap<String, AdjacencyEntry> {
    let mut out: BTreeMap<String, AdjacencyEntry> = BTreeMap::new();
    for node in nodes.values() {
        let included = match node.kind {
            NodeKind::Unresolved => options.include_ghost,
            NodeKind::Script => options.include_scripts,
            NodeKind::Cycle => options.include_cycles,
            _ => !node.is_ghost,
        };
        if included {
            out.insert(node.id.clone(), AdjacencyEntry::default());
        }
    }

    for edge in edges {
        let Some(entry) = out.get_mut(&edge.source) else {
            continue;
        };
        entry.all.push(edge.target.clone());
        let list = match edge.kind {
            EdgeKind::Wiki => &mut entry.wiki,
            EdgeKind::Related => &mut entry.related,
            EdgeKind::Scripts => &mut entry.scripts,
        };
        list.push(edge.target.clone());
    }

    for entry in out.values_mut() {
        for list in [
            &mut entry.all,
            &mut entry.wiki,
            &mut entry.related,
            &mut entry.scripts,
        ] {
            list.sort();
            list.dedup();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgraph_core::MatchedBy;

    fn real(id: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            label: id.to_string(),
            kind: NodeKind::Skill,
            is_ghost: false,
            category: None,
            status: None,
            members: Vec::new(),
        }
    }

    fn edge(source: &str, target: &str, kind: EdgeKind) -> GraphEdge {
        GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            kind,
            matched_by: Some(MatchedBy::Exact),
            raw: None,
            rewritten_from: None,
        }
    }

    fn graph() -> (BTreeMap<String, GraphNode>, Vec<GraphEdge>) {
        let mut nodes: BTreeMap<String, GraphNode> = ["a", "b"]
            .iter()
            .map(|id| (id.to_string(), real(id)))
            .collect();
        nodes.insert(
            "unresolved:x".into(),
            GraphNode::ghost("unresolved:x", "x"),
        );
        nodes.insert("script:s.sh".into(), GraphNode::script("s.sh"));
        let edges = vec![
            edge("a", "b", EdgeKind::Related),
            edge("a", "b", EdgeKind::Wiki),
            edge("a", "unresolved:x", EdgeKind::Related),
            edge("a", "script:s.sh", EdgeKind::Scripts),
            edge("b", "a", EdgeKind::Wiki),
        ];
        (nodes, edges)
    }

    #[test]
    fn default_exports_real_nodes_only() {
        let (nodes, edges) = graph();
        let adjacency = export_adjacency(&nodes, &edges, AdjacencyOptions::default());
        let keys: Vec<_> = adjacency.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);

        let a = &adjacency["a"];
        assert_eq!(a.related, vec!["b", "unresolved:x"]);
        assert_eq!(a.wiki, vec!["b"]);
        assert_eq!(a.scripts, vec!["script:s.sh"]);
        assert_eq!(a.all, vec!["b", "script:s.sh", "unresolved:x"]);
    }

    #[test]
    fn empty_lists_are_retained() {
        let nodes: BTreeMap<String, GraphNode> =
            [("a".to_string(), real("a"))].into_iter().collect();
        let adjacency = export_adjacency(&nodes, &[], AdjacencyOptions::default());
        assert_eq!(adjacency["a"], AdjacencyEntry::default());
    }

    #[test]
    fn option_flags_admit_synthetic_keys() {
        let (nodes, edges) = graph();
        let adjacency = export_adjacency(
            &nodes,
            &edges,
            AdjacencyOptions {
                include_ghost: true,
                include_scripts: true,
                include_cycles: true,
            },
        );
        assert!(adjacency.contains_key("unresolved:x"));
        assert!(adjacency.contains_key("script:s.sh"));
        assert_eq!(adjacency["unresolved:x"], AdjacencyEntry::default());
    }

    #[test]
    fn duplicate_targets_collapse() {
        let nodes: BTreeMap<String, GraphNode> = [("a", "a"), ("b", "b")]
            .iter()
            .map(|(id, _)| (id.to_string(), real(id)))
            .collect();
        let edges = vec![
            edge("a", "b", EdgeKind::Related),
            edge("a", "b", EdgeKind::Wiki),
        ];
        let adjacency = export_adjacency(&nodes, &edges, AdjacencyOptions::default());
        assert_eq!(adjacency["a"].all, vec!["b"]);
    }
}
