use serde::{Deserialize, Serialize};
use skillgraph_core::{SkillKind, SkillRecord};

/// Graph node kind: the six document kinds plus the two synthetic ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Skill,
    Subagent,
    Hook,
    Command,
    Moc,
    Script,
    Unresolved,
    Cycle,
}

impl From<SkillKind> for NodeKind {
    fn from(kind: SkillKind) -> Self {
        match kind {
            SkillKind::Skill => NodeKind::Skill,
            SkillKind::Subagent => NodeKind::Subagent,
            SkillKind::Hook => NodeKind::Hook,
            SkillKind::Command => NodeKind::Command,
            SkillKind::Moc => NodeKind::Moc,
            SkillKind::Script => NodeKind::Script,
        }
    }
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Skill => "skill",
            NodeKind::Subagent => "subagent",
            NodeKind::Hook => "hook",
            NodeKind::Command => "command",
            NodeKind::Moc => "moc",
            NodeKind::Script => "script",
            NodeKind::Unresolved => "unresolved",
            NodeKind::Cycle => "cycle",
        }
    }
}

/// A graph node. Ids are normalized document ids, `unresolved:<slug>`,
/// `script:<raw-path>`, or `cycle:<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub is_ghost: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Sorted member ids for `cycle` nodes; empty otherwise.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub members: Vec<String>,
}

impl GraphNode {
    /// Node for a validated record.
    pub fn from_record(record: &SkillRecord) -> Self {
        GraphNode {
            id: record.id.clone(),
            label: record.display_name.clone(),
            kind: record.kind.into(),
            is_ghost: false,
            category: record.category.clone(),
            status: Some(record.status.as_str().to_string()),
            members: Vec::new(),
        }
    }

    /// Placeholder for an unresolvable reference.
    pub fn ghost(id: impl Into<String>, label: impl Into<String>) -> Self {
        GraphNode {
            id: id.into(),
            label: label.into(),
            kind: NodeKind::Unresolved,
            is_ghost: true,
            category: None,
            status: None,
            members: Vec::new(),
        }
    }

    /// Node for a side-file referenced via `scripts`. The label is the final
    /// path segment.
    pub fn script(path: &str) -> Self {
        let label = path.rsplit('/').next().unwrap_or(path).to_string();
        GraphNode {
            id: format!("script:{path}"),
            label,
            kind: NodeKind::Script,
            is_ghost: false,
            category: None,
            status: None,
            members: Vec::new(),
        }
    }

    /// Supernode replacing a strongly connected component.
    pub fn cycle(index: usize, mut members: Vec<String>) -> Self {
        members.sort();
        GraphNode {
            id: format!("cycle:{index}"),
            label: format!("cycle({})", members.len()),
            kind: NodeKind::Cycle,
            is_ghost: false,
            category: None,
            status: None,
            members,
        }
    }

    /// Whether this node participates in cycle analysis.
    pub fn is_cycle_eligible(&self) -> bool {
        !self.is_ghost
            && !matches!(
                self.kind,
                NodeKind::Unresolved | NodeKind::Script | NodeKind::Cycle
            )
    }
}
