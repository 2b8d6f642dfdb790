use serde_json::Value;
use std::collections::BTreeMap;

use crate::frontmatter::extract_header;
use crate::normalize::normalize_id;
use crate::record::{SkillKind, SkillRecord, SkillStatus};
use crate::wikilink::extract_wiki_links;

/// Result of validating one document. The validator never fails: a defective
/// document produces errors/warnings but always yields a record for display.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub record: SkillRecord,
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

const RECOGNIZED_KEYS: &[&str] = &[
    "name",
    "type",
    "category",
    "tags",
    "status",
    "version",
    "related",
    "scripts",
    "aliases",
    "moc",
    "description",
    "title",
    "phase",
];

/// Derive the file stem (filename without extension) from a relative path.
pub fn file_stem_of(rel_path: &str) -> String {
    let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

/// Validate a scanned document and produce a normalized record.
///
/// Returns `None` when the document carries no metadata header. Such files
/// are skipped for graph purposes but still counted by the helper tally.
pub fn validate_document(rel_path: &str, text: &str) -> Option<ValidationOutcome> {
    let (fields, body) = extract_header(text)?;
    Some(validate_fields(rel_path, &fields, body))
}

/// Validate a pre-extracted header map. Exposed separately so hosts that
/// parse documents themselves can reuse the coercion rules.
pub fn validate_fields(
    rel_path: &str,
    fields: &BTreeMap<String, Value>,
    body: &str,
) -> ValidationOutcome {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let file_stem = file_stem_of(rel_path);

    // name is required; fall back to the file stem so the record stays
    // displayable and addressable even when invalid.
    let display_name = match fields.get("name") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::String(_)) | None => {
            errors.push("missing required field `name`".to_string());
            file_stem.clone()
        }
        Some(other) => {
            errors.push(format!(
                "field `name` must be a string, got {}",
                value_type_name(other)
            ));
            file_stem.clone()
        }
    };

    let mut kind = match fields.get("type") {
        None => SkillKind::default(),
        Some(Value::String(s)) => {
            let lowered = s.trim().to_ascii_lowercase();
            match SkillKind::parse(&lowered) {
                Some(k) => k,
                None => {
                    warnings.push(format!("unrecognized `type` value `{s}`, using `skill`"));
                    SkillKind::default()
                }
            }
        }
        Some(other) => {
            warnings.push(format!(
                "field `type` must be a string, got {}; using `skill`",
                value_type_name(other)
            ));
            SkillKind::default()
        }
    };

    let moc = coerce_bool(fields.get("moc"), "moc", &mut warnings);
    if moc {
        kind = SkillKind::Moc;
    }

    let status = match fields.get("status") {
        None => SkillStatus::default(),
        Some(Value::String(s)) => {
            let lowered = s.trim().to_ascii_lowercase();
            match SkillStatus::parse(&lowered) {
                Some(st) => st,
                None => {
                    warnings.push(format!("unrecognized `status` value `{s}`, using `stable`"));
                    SkillStatus::default()
                }
            }
        }
        Some(other) => {
            warnings.push(format!(
                "field `status` must be a string, got {}; using `stable`",
                value_type_name(other)
            ));
            SkillStatus::default()
        }
    };

    let category = coerce_opt_string(fields.get("category"), "category", &mut warnings);

    let version = match fields.get("version") {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            warnings.push(format!("field `version` coerced from number `{n}`"));
            n.to_string()
        }
        Some(other) => {
            warnings.push(format!(
                "field `version` must be a string, got {}",
                value_type_name(other)
            ));
            String::new()
        }
    };

    let tags = coerce_tags(fields.get("tags"), &mut warnings);
    let related = coerce_string_list(fields.get("related"), "related", &mut warnings);
    let scripts = coerce_string_list(fields.get("scripts"), "scripts", &mut warnings);
    let aliases = coerce_string_list(fields.get("aliases"), "aliases", &mut warnings);

    let description = coerce_opt_string(fields.get("description"), "description", &mut warnings);
    let title = coerce_opt_string(fields.get("title"), "title", &mut warnings);
    let phase = coerce_opt_string(fields.get("phase"), "phase", &mut warnings);

    let extra: BTreeMap<String, Value> = fields
        .iter()
        .filter(|(k, _)| !RECOGNIZED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let wiki_links = extract_wiki_links(body);

    let record = SkillRecord {
        id: normalize_id(&display_name),
        display_name,
        kind,
        status,
        category,
        version,
        tags,
        related,
        wiki_links,
        scripts,
        aliases,
        file_stem,
        source_path: rel_path.to_string(),
        description,
        title,
        phase,
        extra,
        body: body.to_string(),
    };

    ValidationOutcome {
        valid: errors.is_empty(),
        record,
        errors,
        warnings,
    }
}

/// Validate a whole scanned collection of `(rel_path, text)` pairs.
///
/// Headerless documents are dropped. Records whose normalized ids collide
/// gain a warning on every occurrence after the first; the first insertion
/// wins for display downstream.
pub fn validate_collection(docs: &[(String, String)]) -> Vec<ValidationOutcome> {
    let mut outcomes: Vec<ValidationOutcome> = docs
        .iter()
        .filter_map(|(path, text)| validate_document(path, text))
        .collect();

    let mut first_by_id: BTreeMap<String, String> = BTreeMap::new();
    for outcome in &mut outcomes {
        let id = outcome.record.id.clone();
        if id.is_empty() {
            continue;
        }
        match first_by_id.get(&id) {
            Some(first_path) => outcome.warnings.push(format!(
                "duplicate id `{id}` also produced by {first_path}; first insertion wins for display"
            )),
            None => {
                first_by_id.insert(id, outcome.record.source_path.clone());
            }
        }
    }
    outcomes
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn coerce_opt_string(v: Option<&Value>, key: &str, warnings: &mut Vec<String>) -> Option<String> {
    match v {
        None => None,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(other) => {
            warnings.push(format!(
                "field `{key}` must be a string, got {}; ignoring",
                value_type_name(other)
            ));
            None
        }
    }
}

fn coerce_bool(v: Option<&Value>, key: &str, warnings: &mut Vec<String>) -> bool {
    match v {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => {
                warnings.push(format!("field `{key}` coerced from string \"true\""));
                true
            }
            "false" => {
                warnings.push(format!("field `{key}` coerced from string \"false\""));
                false
            }
            _ => {
                warnings.push(format!("field `{key}` has non-boolean value `{s}`; using false"));
                false
            }
        },
        Some(other) => {
            warnings.push(format!(
                "field `{key}` must be a boolean, got {}; using false",
                value_type_name(other)
            ));
            false
        }
    }
}

/// `tags` accepts a list of strings, a single plain string, or one
/// comma-separated string.
fn coerce_tags(v: Option<&Value>, warnings: &mut Vec<String>) -> Vec<String> {
    match v {
        None => Vec::new(),
        Some(Value::Array(items)) => collect_string_items(items, "tags", warnings),
        Some(Value::String(s)) => {
            if s.contains(',') {
                warnings.push("field `tags` coerced from comma-separated string".to_string());
                s.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            } else {
                warnings.push("field `tags` coerced from single string".to_string());
                vec![s.trim().to_string()]
            }
        }
        Some(other) => {
            warnings.push(format!(
                "field `tags` must be a list, got {}; ignoring",
                value_type_name(other)
            ));
            Vec::new()
        }
    }
}

/// `related`/`scripts`/`aliases` accept a list of strings; a single string
/// wraps to a list of one.
fn coerce_string_list(v: Option<&Value>, key: &str, warnings: &mut Vec<String>) -> Vec<String> {
    match v {
        None => Vec::new(),
        Some(Value::Array(items)) => collect_string_items(items, key, warnings),
        Some(Value::String(s)) => {
            warnings.push(format!("field `{key}` coerced from single string"));
            vec![s.clone()]
        }
        Some(other) => {
            warnings.push(format!(
                "field `{key}` must be a list, got {}; ignoring",
                value_type_name(other)
            ));
            Vec::new()
        }
    }
}

fn collect_string_items(items: &[Value], key: &str, warnings: &mut Vec<String>) -> Vec<String> {
    let mut out = Vec::new();
    for item in items {
        match item {
            Value::String(s) => out.push(s.clone()),
            Value::Number(n) => {
                warnings.push(format!("field `{key}` item coerced from number `{n}`"));
                out.push(n.to_string());
            }
            other => {
                warnings.push(format!(
                    "field `{key}` item must be a string, got {}; skipping",
                    value_type_name(other)
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(header: &str, body: &str) -> String {
        format!("---\n{header}\n---\n{body}")
    }

    #[test]
    fn minimal_valid_document() {
        let text = doc("name: Valuation Basics", "Some body text.");
        let outcome = validate_document("skills/valuation.md", &text).unwrap();
        assert!(outcome.valid);
        assert!(outcome.errors.is_empty());
        assert!(outcome.warnings.is_empty());
        let r = &outcome.record;
        assert_eq!(r.id, "valuation-basics");
        assert_eq!(r.display_name, "Valuation Basics");
        assert_eq!(r.kind, SkillKind::Skill);
        assert_eq!(r.status, SkillStatus::Stable);
        assert_eq!(r.file_stem, "valuation");
        assert_eq!(r.source_path, "skills/valuation.md");
        assert_eq!(r.body, "Some body text.");
    }

    #[test]
    fn headerless_document_is_skipped() {
        assert!(validate_document("a.md", "no header at all").is_none());
    }

    #[test]
    fn missing_name_is_invalid_but_emitted() {
        let text = doc("type: hook", "");
        let outcome = validate_document("hooks/pre-commit.md", &text).unwrap();
        assert!(!outcome.valid);
        assert_eq!(outcome.errors.len(), 1);
        // Display falls back to the file stem.
        assert_eq!(outcome.record.display_name, "pre-commit");
        assert_eq!(outcome.record.id, "pre-commit");
        assert_eq!(outcome.record.kind, SkillKind::Hook);
    }

    #[test]
    fn unknown_type_falls_back_with_warning() {
        let text = doc("name: a\ntype: widget", "");
        let outcome = validate_document("a.md", &text).unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.record.kind, SkillKind::Skill);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn moc_flag_forces_kind() {
        let text = doc("name: a\ntype: command\nmoc: true", "");
        let outcome = validate_document("a.md", &text).unwrap();
        assert_eq!(outcome.record.kind, SkillKind::Moc);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn moc_string_coercion_warns() {
        let text = doc("name: a\nmoc: \"true\"", "");
        let outcome = validate_document("a.md", &text).unwrap();
        assert_eq!(outcome.record.kind, SkillKind::Moc);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn tags_comma_separated_string_splits() {
        let text = doc("name: a\ntags: \"finance, modeling , \"", "");
        let outcome = validate_document("a.md", &text).unwrap();
        assert_eq!(outcome.record.tags, vec!["finance", "modeling"]);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn tags_single_string_wraps() {
        let text = doc("name: a\ntags: finance", "");
        let outcome = validate_document("a.md", &text).unwrap();
        assert_eq!(outcome.record.tags, vec!["finance"]);
    }

    #[test]
    fn related_single_string_wraps() {
        let text = doc("name: a\nrelated: other-skill", "");
        let outcome = validate_document("a.md", &text).unwrap();
        assert_eq!(outcome.record.related, vec!["other-skill"]);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn version_number_coerces_to_string() {
        let text = doc("name: a\nversion: 2", "");
        let outcome = validate_document("a.md", &text).unwrap();
        assert_eq!(outcome.record.version, "2");
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn unknown_status_falls_back() {
        let text = doc("name: a\nstatus: shiny", "");
        let outcome = validate_document("a.md", &text).unwrap();
        assert_eq!(outcome.record.status, SkillStatus::Stable);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn unrecognized_keys_pass_through() {
        let text = doc("name: a\nowner: alice\npriority: 3", "");
        let outcome = validate_document("a.md", &text).unwrap();
        assert_eq!(outcome.record.extra.len(), 2);
        assert_eq!(outcome.record.extra["owner"], Value::String("alice".into()));
    }

    #[test]
    fn wiki_links_extracted_from_body() {
        let text = doc("name: a", "See [[Other Skill]] and [[b|alias]].");
        let outcome = validate_document("a.md", &text).unwrap();
        let targets: Vec<_> = outcome
            .record
            .wiki_links
            .iter()
            .map(|l| l.target.as_str())
            .collect();
        assert_eq!(targets, vec!["Other Skill", "b"]);
    }

    #[test]
    fn duplicate_ids_warn_on_later_records() {
        let docs = vec![
            ("a.md".to_string(), doc("name: Shared Name", "")),
            ("b.md".to_string(), doc("name: shared name", "")),
            ("c.md".to_string(), doc("name: unique", "")),
        ];
        let outcomes = validate_collection(&docs);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].warnings.is_empty());
        assert_eq!(outcomes[1].warnings.len(), 1);
        assert!(outcomes[1].warnings[0].contains("duplicate id"));
        assert!(outcomes[2].warnings.is_empty());
    }

    #[test]
    fn file_stem_handles_nested_paths() {
        assert_eq!(file_stem_of("a/b/c.md"), "c");
        assert_eq!(file_stem_of("plain.md"), "plain");
        assert_eq!(file_stem_of("noext"), "noext");
        assert_eq!(file_stem_of(".hidden"), ".hidden");
    }
}
