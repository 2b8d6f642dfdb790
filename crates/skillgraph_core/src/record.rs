use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Document kind, as declared by the `type` header key.
///
/// Unrecognized values fall back to `Skill`; a true `moc` flag forces `Moc`
/// regardless of the declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    Skill,
    Subagent,
    Hook,
    Command,
    Moc,
    Script,
}

impl SkillKind {
    /// Parse a lowercased `type` value. Returns `None` for unknown values so
    /// the validator can warn before applying the default.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "skill" => Some(SkillKind::Skill),
            "subagent" => Some(SkillKind::Subagent),
            "hook" => Some(SkillKind::Hook),
            "command" => Some(SkillKind::Command),
            "moc" => Some(SkillKind::Moc),
            "script" => Some(SkillKind::Script),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillKind::Skill => "skill",
            SkillKind::Subagent => "subagent",
            SkillKind::Hook => "hook",
            SkillKind::Command => "command",
            SkillKind::Moc => "moc",
            SkillKind::Script => "script",
        }
    }
}

impl Default for SkillKind {
    fn default() -> Self {
        SkillKind::Skill
    }
}

/// Lifecycle status from the `status` header key. Unrecognized values fall
/// back to `Stable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillStatus {
    Stable,
    Draft,
    Deprecated,
    Experimental,
    Archived,
}

impl SkillStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stable" => Some(SkillStatus::Stable),
            "draft" => Some(SkillStatus::Draft),
            "deprecated" => Some(SkillStatus::Deprecated),
            "experimental" => Some(SkillStatus::Experimental),
            "archived" => Some(SkillStatus::Archived),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillStatus::Stable => "stable",
            SkillStatus::Draft => "draft",
            SkillStatus::Deprecated => "deprecated",
            SkillStatus::Experimental => "experimental",
            SkillStatus::Archived => "archived",
        }
    }
}

impl Default for SkillStatus {
    fn default() -> Self {
        SkillStatus::Stable
    }
}

/// An in-body reference, `[[target]]` or `[[target|alias]]`, both parts raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiLink {
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A validated document record. Constructed by the validator, read-only
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRecord {
    /// Normalized identifier; may be empty when the display name slugs away
    /// to nothing ("unknown").
    pub id: String,
    /// Original human-readable name, trimmed.
    pub display_name: String,
    pub kind: SkillKind,
    pub status: SkillStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub version: String,
    pub tags: Vec<String>,
    /// Raw reference strings from the `related` header key.
    pub related: Vec<String>,
    /// References extracted from the body.
    pub wiki_links: Vec<WikiLink>,
    /// Side-file paths from the `scripts` header key.
    pub scripts: Vec<String>,
    /// Alternative names the resolver indexes alongside the display name.
    pub aliases: Vec<String>,
    /// Filename without extension; last-resort match key.
    pub file_stem: String,
    /// Path relative to the scan root.
    pub source_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Header keys the validator does not recognize, passed through unchanged.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub extra: BTreeMap<String, Value>,
    /// Body text after the header.
    pub body: String,
}
