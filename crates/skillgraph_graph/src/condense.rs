use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::edge::GraphEdge;
use crate::node::GraphNode;

/// Summary of one condensed strongly connected component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInfo {
    pub id: String,
    pub members: Vec<String>,
    pub label: String,
}

/// Replace every nontrivial strongly connected component with a single
/// supernode and rewrite the edge set through the member map.
///
/// Eligibility: ghosts, script nodes, and pre-existing cycle nodes stay out
/// of the analysis; edges touching them pass through untouched. A component
/// is nontrivial when it has two or more members, or one member with a
/// self-loop anywhere in the unfiltered edge set. Supernodes are numbered
/// 1-based in the order Tarjan emits their components.
pub fn condense(
    nodes: &BTreeMap<String, GraphNode>,
    edges: &[GraphEdge],
) -> (BTreeMap<String, GraphNode>, Vec<GraphEdge>, Vec<CycleInfo>) {
    let eligible: BTreeSet<&str> = nodes
        .values()
        .filter(|n| n.is_cycle_eligible())
        .map(|n| n.id.as_str())
        .collect();

    // Sub-adjacency over eligible endpoints only, neighbor lists sorted so
    // component emission order is deterministic.
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for &id in &eligible {
        adjacency.insert(id, Vec::new());
    }
    for edge in edges {
        if eligible.contains(edge.source.as_str()) && eligible.contains(edge.target.as_str()) {
            if let Some(neighbors) = adjacency.get_mut(edge.source.as_str()) {
                neighbors.push(edge.target.as_str());
            }
        }
    }
    for neighbors in adjacency.values_mut() {
        neighbors.sort_unstable();
        neighbors.dedup();
    }

    let components = tarjan_scc(&adjacency);

    let self_loops: BTreeSet<&str> = edges
        .iter()
        .filter(|e| e.source == e.target)
        .map(|e| e.source.as_str())
        .collect();

    // Enumerate nontrivial components in emission order.
    let mut cycles = Vec::new();
    let mut member_to_cycle: BTreeMap<&str, String> = BTreeMap::new();
    for component in &components {
        let nontrivial =
            component.len() >= 2 || (component.len() == 1 && self_loops.contains(component[0]));
        if !nontrivial {
            continue;
        }
        let index = cycles.len() + 1;
        let node = GraphNode::cycle(index, component.iter().map(|s| s.to_string()).collect());
        for &member in component {
            member_to_cycle.insert(member, node.id.clone());
        }
        cycles.push(CycleInfo {
            id: node.id.clone(),
            members: node.members.clone(),
            label: node.label.clone(),
        });
    }

    // Condensed node set: originals minus absorbed members, plus supernodes.
    let mut out_nodes: BTreeMap<String, GraphNode> = nodes
        .iter()
        .filter(|(id, _)| !member_to_cycle.contains_key(id.as_str()))
        .map(|(id, node)| (id.clone(), node.clone()))
        .collect();
    for cycle in &cycles {
        let node = GraphNode {
            id: cycle.id.clone(),
            label: cycle.label.clone(),
            kind: crate::node::NodeKind::Cycle,
            is_ghost: false,
            category: None,
            status: None,
            members: cycle.members.clone(),
        };
        out_nodes.insert(node.id.clone(), node);
    }

    // Rewrite edges through the member map; collapsed self-loops drop.
    let mut out_edges = Vec::new();
    let mut seen = BTreeSet::new();
    for edge in edges {
        let source = member_to_cycle
            .get(edge.source.as_str())
            .cloned()
            .unwrap_or_else(|| edge.source.clone());
        let target = member_to_cycle
            .get(edge.target.as_str())
            .cloned()
            .unwrap_or_else(|| edge.target.clone());
        if source == target {
            continue;
        }
        let rewritten = source != edge.source || target != edge.target;
        let new_edge = GraphEdge {
            source,
            target,
            kind: edge.kind,
            matched_by: edge.matched_by,
            raw: edge.raw.clone(),
            rewritten_from: if rewritten { Some(edge.key()) } else { None },
        };
        if !seen.insert(new_edge.key()) {
            continue;
        }
        out_edges.push(new_edge);
    }

    (out_nodes, out_edges, cycles)
}

/// Iterative Tarjan SCC over a sorted adjacency map. Components come out in
/// the order the algorithm completes them (reverse topological order).
fn tarjan_scc<'a>(adjacency: &BTreeMap<&'a str, Vec<&'a str>>) -> Vec<Vec<&'a str>> {
    struct Frame<'a> {
        node: &'a str,
        next_child: usize,
    }

    let mut index_of: BTreeMap<&str, usize> = BTreeMap::new();
    let mut lowlink: BTreeMap<&str, usize> = BTreeMap::new();
    let mut on_stack: BTreeSet<&str> = BTreeSet::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut components: Vec<Vec<&str>> = Vec::new();
    let mut next_index = 0usize;

    for &start in adjacency.keys() {
        if index_of.contains_key(start) {
            continue;
        }

        let mut frames = vec![Frame {
            node: start,
            next_child: 0,
        }];
        index_of.insert(start, next_index);
        lowlink.insert(start, next_index);
        next_index += 1;
        stack.push(start);
        on_stack.insert(start);

        while let Some(frame) = frames.last_mut() {
            let node = frame.node;
            let children = &adjacency[node];

            if frame.next_child < children.len() {
                let child = children[frame.next_child];
                frame.next_child += 1;

                match index_of.get(child) {
                    None => {
                        index_of.insert(child, next_index);
                        lowlink.insert(child, next_index);
                        next_index += 1;
                        stack.push(child);
                        on_stack.insert(child);
                        frames.push(Frame {
                            node: child,
                            next_child: 0,
                        });
                    }
                    Some(&child_index) => {
                        if on_stack.contains(child) {
                            let low = lowlink[node].min(child_index);
                            lowlink.insert(node, low);
                        }
                    }
                }
                continue;
            }

            // All children visited: close out this node.
            if lowlink[node] == index_of[node] {
                let mut component = Vec::new();
                while let Some(top) = stack.pop() {
                    on_stack.remove(top);
                    component.push(top);
                    if top == node {
                        break;
                    }
                }
                components.push(component);
            }

            frames.pop();
            if let Some(parent) = frames.last() {
                let low = lowlink[parent.node].min(lowlink[node]);
                lowlink.insert(parent.node, low);
            }
        }
    }

    components
}
