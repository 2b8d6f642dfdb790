use std::collections::{BTreeMap, BTreeSet};

use skillgraph_core::{RefResolver, SkillRecord};

use crate::edge::{EdgeKind, GraphEdge};
use crate::node::GraphNode;

/// Incremental node/edge accumulator with idempotent upsert and edge
/// de-duplication by `(source, target, kind)`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: BTreeMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
    edge_keys: BTreeSet<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or merge a node.
    ///
    /// A ghost promoted by a real node keeps its id but takes the real
    /// kind, label, and display attributes. Real-over-real keeps the
    /// existing attributes; the first record wins for display. A ghost
    /// arriving over any existing node changes nothing.
    pub fn upsert_node(&mut self, node: GraphNode) {
        match self.nodes.get_mut(&node.id) {
            None => {
                self.nodes.insert(node.id.clone(), node);
            }
            Some(existing) => {
                if existing.is_ghost && !node.is_ghost {
                    existing.kind = node.kind;
                    existing.label = node.label;
                    existing.category = node.category;
                    existing.status = node.status;
                    existing.is_ghost = false;
                }
            }
        }
    }

    /// Append an edge unless its `(source, target, kind)` triple is already
    /// present.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        if self.edge_keys.insert(edge.key()) {
            self.edges.push(edge);
        }
    }

    pub fn into_parts(self) -> (BTreeMap<String, GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }
}

/// Build the unsorted node map and edge list from validated records.
///
/// Two passes: all real nodes first, then edges, so references between
/// records never spawn ghosts for documents that exist. Records whose id
/// normalized away to nothing are skipped.
pub fn build_nodes_and_edges(
    records: &[SkillRecord],
    resolver: &RefResolver,
) -> (BTreeMap<String, GraphNode>, Vec<GraphEdge>) {
    let mut builder = GraphBuilder::new();

    for record in records {
        if record.id.is_empty() {
            continue;
        }
        builder.upsert_node(GraphNode::from_record(record));
    }

    for record in records {
        if record.id.is_empty() {
            continue;
        }

        for script in &record.scripts {
            let path = script.trim();
            if path.is_empty() {
                continue;
            }
            let node = GraphNode::script(path);
            let target = node.id.clone();
            builder.upsert_node(node);
            builder.add_edge(GraphEdge {
                source: record.id.clone(),
                target,
                kind: EdgeKind::Scripts,
                matched_by: None,
                raw: None,
                rewritten_from: None,
            });
        }

        for raw in &record.related {
            add_reference_edge(&mut builder, resolver, record, raw, EdgeKind::Related);
        }

        for link in &record.wiki_links {
            add_reference_edge(&mut builder, resolver, record, &link.target, EdgeKind::Wiki);
        }
    }

    builder.into_parts()
}

fn add_reference_edge(
    builder: &mut GraphBuilder,
    resolver: &RefResolver,
    record: &SkillRecord,
    raw: &str,
    kind: EdgeKind,
) {
    let resolution = resolver.resolve(raw);
    if !resolution.found {
        builder.upsert_node(GraphNode::ghost(
            resolution.id.clone(),
            resolution.display_name.clone(),
        ));
    }
    builder.add_edge(GraphEdge {
        source: record.id.clone(),
        target: resolution.id,
        kind,
        matched_by: Some(resolution.matched_by),
        raw: Some(raw.to_string()),
        rewritten_from: None,
    });
}
