use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::normalize::normalize_id;
use crate::record::SkillRecord;

/// The tier at which a reference matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchedBy {
    Exact,
    Normalized,
    FilenameStem,
    Ghost,
}

impl MatchedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchedBy::Exact => "exact",
            MatchedBy::Normalized => "normalized",
            MatchedBy::FilenameStem => "filename-stem",
            MatchedBy::Ghost => "ghost",
        }
    }
}

/// Verdict for one raw reference. `id` is a known record id when `found`,
/// otherwise a ghost placeholder id (`unresolved:<slug>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub found: bool,
    pub matched_by: MatchedBy,
    pub id: String,
    pub display_name: String,
}

/// Maps free-form reference strings to known record ids, with multi-tier
/// fallback. Built once per build from the full record set; resolution is
/// pure and repeatable.
///
/// Index tiers, strictly ordered:
/// 1. exact: display names and aliases, as written (trimmed);
/// 2. normalized: slugged names/aliases plus the record ids themselves;
/// 3. stem: normalized filename stems, the last resort.
///
/// Within each index the first inserted record wins, so collisions between
/// a name and another record's alias stay stable.
pub struct RefResolver {
    exact: BTreeMap<String, ResolvedTarget>,
    normalized: BTreeMap<String, ResolvedTarget>,
    stem: BTreeMap<String, ResolvedTarget>,
}

#[derive(Debug, Clone)]
struct ResolvedTarget {
    id: String,
    display_name: String,
}

impl RefResolver {
    pub fn new(records: &[SkillRecord]) -> Self {
        let mut exact = BTreeMap::new();
        let mut normalized = BTreeMap::new();
        let mut stem = BTreeMap::new();

        for record in records {
            if record.id.is_empty() {
                continue;
            }
            let target = ResolvedTarget {
                id: record.id.clone(),
                display_name: record.display_name.clone(),
            };

            insert_first(&mut exact, record.display_name.trim(), &target);
            insert_first(&mut normalized, &record.id, &target);
            insert_first(&mut normalized, &normalize_id(&record.display_name), &target);
            insert_first(&mut stem, &normalize_id(&record.file_stem), &target);

            for alias in &record.aliases {
                let trimmed = alias.trim();
                if trimmed.is_empty() {
                    continue;
                }
                insert_first(&mut exact, trimmed, &target);
                insert_first(&mut normalized, &normalize_id(trimmed), &target);
            }
        }

        RefResolver {
            exact,
            normalized,
            stem,
        }
    }

    /// Resolve a raw reference string. Never fails: unknown targets come back
    /// as ghosts with an `unresolved:` id.
    pub fn resolve(&self, raw_target: &str) -> Resolution {
        let trimmed = raw_target.trim();
        if trimmed.is_empty() {
            return Resolution {
                found: false,
                matched_by: MatchedBy::Ghost,
                id: "unresolved:unknown".to_string(),
                display_name: "unknown".to_string(),
            };
        }

        if let Some(target) = self.exact.get(trimmed) {
            return hit(target, MatchedBy::Exact);
        }

        let norm = normalize_id(trimmed);
        if !norm.is_empty() {
            if let Some(target) = self.normalized.get(&norm) {
                return hit(target, MatchedBy::Normalized);
            }
            if let Some(target) = self.stem.get(&norm) {
                return hit(target, MatchedBy::FilenameStem);
            }
        }

        let slug = if norm.is_empty() {
            "unknown".to_string()
        } else {
            norm
        };
        Resolution {
            found: false,
            matched_by: MatchedBy::Ghost,
            id: format!("unresolved:{slug}"),
            display_name: trimmed.to_string(),
        }
    }
}

fn insert_first(index: &mut BTreeMap<String, ResolvedTarget>, key: &str, target: &ResolvedTarget) {
    if key.is_empty() {
        return;
    }
    index.entry(key.to_string()).or_insert_with(|| target.clone());
}

fn hit(target: &ResolvedTarget, matched_by: MatchedBy) -> Resolution {
    Resolution {
        found: true,
        matched_by,
        id: target.id.clone(),
        display_name: target.display_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SkillKind, SkillStatus};
    use std::collections::BTreeMap;

    fn record(name: &str, stem: &str, aliases: &[&str]) -> SkillRecord {
        SkillRecord {
            id: normalize_id(name),
            display_name: name.to_string(),
            kind: SkillKind::Skill,
            status: SkillStatus::Stable,
            category: None,
            version: String::new(),
            tags: Vec::new(),
            related: Vec::new(),
            wiki_links: Vec::new(),
            scripts: Vec::new(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            file_stem: stem.to_string(),
            source_path: format!("{stem}.md"),
            description: None,
            title: None,
            phase: None,
            extra: BTreeMap::new(),
            body: String::new(),
        }
    }

    #[test]
    fn exact_display_name_match() {
        let records = vec![record("EBITDA Adjustments", "ebitda", &[])];
        let resolver = RefResolver::new(&records);
        let res = resolver.resolve("EBITDA Adjustments");
        assert!(res.found);
        assert_eq!(res.matched_by, MatchedBy::Exact);
        assert_eq!(res.id, "ebitda-adjustments");
    }

    #[test]
    fn alias_matches_exact_tier() {
        let records = vec![
            record("ebitda-adjustments", "ebitda-adjustments", &["qoe-bridge"]),
            record("foo", "foo", &[]),
        ];
        let resolver = RefResolver::new(&records);
        let res = resolver.resolve("qoe-bridge");
        assert!(res.found);
        assert_eq!(res.matched_by, MatchedBy::Exact);
        assert_eq!(res.id, "ebitda-adjustments");
    }

    #[test]
    fn normalized_fallback() {
        let records = vec![record("Deal Structuring", "deals", &[])];
        let resolver = RefResolver::new(&records);
        let res = resolver.resolve("deal structuring");
        assert!(res.found);
        assert_eq!(res.matched_by, MatchedBy::Normalized);
        assert_eq!(res.id, "deal-structuring");
    }

    #[test]
    fn id_resolves_in_normalized_tier() {
        let records = vec![record("Deal Structuring", "deals", &[])];
        let resolver = RefResolver::new(&records);
        let res = resolver.resolve("deal-structuring");
        assert!(res.found);
        assert!(matches!(
            res.matched_by,
            MatchedBy::Exact | MatchedBy::Normalized
        ));
    }

    #[test]
    fn stem_is_last_resort() {
        let records = vec![record("Working Capital", "wc-analysis", &[])];
        let resolver = RefResolver::new(&records);
        let res = resolver.resolve("WC Analysis");
        assert!(res.found);
        assert_eq!(res.matched_by, MatchedBy::FilenameStem);
        assert_eq!(res.id, "working-capital");
    }

    #[test]
    fn unknown_target_ghosts() {
        let resolver = RefResolver::new(&[]);
        let res = resolver.resolve("Missing Skill");
        assert!(!res.found);
        assert_eq!(res.matched_by, MatchedBy::Ghost);
        assert_eq!(res.id, "unresolved:missing-skill");
        assert_eq!(res.display_name, "Missing Skill");
    }

    #[test]
    fn empty_target_is_unknown_ghost() {
        let resolver = RefResolver::new(&[]);
        for raw in ["", "   ", "\t"] {
            let res = resolver.resolve(raw);
            assert_eq!(res.id, "unresolved:unknown");
            assert_eq!(res.display_name, "unknown");
            assert_eq!(res.matched_by, MatchedBy::Ghost);
        }
    }

    #[test]
    fn symbols_only_target_slugs_to_unknown() {
        let resolver = RefResolver::new(&[]);
        let res = resolver.resolve("***");
        assert_eq!(res.id, "unresolved:unknown");
        assert_eq!(res.display_name, "***");
    }

    #[test]
    fn first_insertion_wins_on_collision() {
        let records = vec![
            record("shared-name", "first", &[]),
            record("Shared Name", "second", &[]),
        ];
        let resolver = RefResolver::new(&records);
        let res = resolver.resolve("shared name");
        assert!(res.found);
        assert_eq!(res.display_name, "shared-name");
    }

    #[test]
    fn repeated_calls_are_stable() {
        let records = vec![record("a", "a", &["b"])];
        let resolver = RefResolver::new(&records);
        let first = resolver.resolve("b");
        let second = resolver.resolve("b");
        assert_eq!(first, second);
    }
}
