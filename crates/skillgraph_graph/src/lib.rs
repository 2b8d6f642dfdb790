//! Node/edge graph construction over validated skill records.
//!
//! The pipeline here is pure: records go in, a sorted, de-duplicated,
//! optionally cycle-condensed graph comes out. The only async boundary is
//! [`build_graph`], which drives the scanner over an adapter before handing
//! off to the pure phases.

pub mod adjacency;
pub mod build;
pub mod builder;
pub mod condense;
pub mod edge;
pub mod node;

pub use adjacency::{export_adjacency, AdjacencyEntry, AdjacencyOptions};
pub use build::{build_graph, build_graph_from_records, BuildOptions, GraphMeta, GraphOutput};
pub use builder::build_nodes_and_edges;
pub use condense::{condense, CycleInfo};
pub use edge::{EdgeKind, GraphEdge};
pub use node::{GraphNode, NodeKind};
