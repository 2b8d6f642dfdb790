use serde::{Deserialize, Serialize};
use skillgraph_core::MatchedBy;

/// Edge kind. The same `(source, target)` pair may carry one edge per kind;
/// identical `(source, target, kind)` triples are de-duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Related,
    Wiki,
    Scripts,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Related => "related",
            EdgeKind::Wiki => "wiki",
            EdgeKind::Scripts => "scripts",
        }
    }
}

/// A directed edge between node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    /// Resolver tier for `related`/`wiki` edges; absent for `scripts`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<MatchedBy>,
    /// The reference text as written in the source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Key of the pre-condensation edge this one was rewritten from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewritten_from: Option<String>,
}

impl GraphEdge {
    /// De-duplication and traceability key: `source|target|kind`.
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.source, self.target, self.kind.as_str())
    }

    /// Sort key for the exported edge list: lexicographic on the kind name,
    /// not on enum variant order.
    pub fn sort_key(&self) -> (&str, &str, &'static str) {
        (&self.source, &self.target, self.kind.as_str())
    }
}
