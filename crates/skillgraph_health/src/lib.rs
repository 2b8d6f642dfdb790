//! Collection health rules.
//!
//! Six independent rules run over a scanned vault and aggregate into one
//! report. The first three touch only the adapter and run concurrently; the
//! last three share a single scan pass. No rule ever fails the build;
//! adapter problems surface as rule verdicts, not errors.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::time::Instant;

use skillgraph_core::{
    extract_wiki_links, file_stem_of, has_structure_heading, normalize_id, validate_collection,
    RefResolver, SkillRecord,
};
use skillgraph_vault::{scan, CancelFlag, VaultAdapter};

/// Semantic version of the report schema.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Rule verdict, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pass,
    Warn,
    Fail,
}

/// One rule's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule_id: String,
    pub status: RuleStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

/// Aggregated report. `overall` is the worst individual status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub version: String,
    pub overall: RuleStatus,
    pub results: Vec<RuleResult>,
    /// ISO-8601 UTC timestamp taken at aggregation.
    pub checked_at: String,
    /// Milliseconds from start to aggregation.
    pub duration_ms: u64,
}

/// Check a report's schema version. A mismatch is a warning for the caller
/// to surface, never an error.
pub fn validate_report_version(report: &HealthReport) -> Option<String> {
    if report.version == REPORT_SCHEMA_VERSION {
        None
    } else {
        Some(format!(
            "health report schema version `{}` does not match expected `{}`",
            report.version, REPORT_SCHEMA_VERSION
        ))
    }
}

/// Run all six rules and aggregate. Cancellation stops further reads; rules
/// then judge whatever was gathered.
pub async fn run_health_checks(adapter: &dyn VaultAdapter, cancel: &CancelFlag) -> HealthReport {
    let started = Instant::now();

    let (repo, tracking, doc_count) = if cancel.is_cancelled() {
        (false, false, 0)
    } else {
        tokio::join!(
            adapter.is_repo(),
            adapter.has_tracking_marker(),
            adapter.document_count()
        )
    };

    let docs = scan(adapter, cancel).await;
    let pairs: Vec<(String, String)> = docs.into_iter().map(|d| (d.rel_path, d.text)).collect();
    let outcomes = validate_collection(&pairs);
    let records: Vec<SkillRecord> = outcomes.into_iter().map(|o| o.record).collect();

    let results = vec![
        repo_rule(repo),
        tracking_rule(tracking),
        document_count_rule(doc_count),
        references_rule(&pairs, &records),
        structure_rule(&records),
        helpers_rule(&pairs, &records),
    ];

    let overall = results
        .iter()
        .map(|r| r.status)
        .max()
        .unwrap_or(RuleStatus::Pass);

    HealthReport {
        version: REPORT_SCHEMA_VERSION.to_string(),
        overall,
        results,
        checked_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

fn repo_rule(present: bool) -> RuleResult {
    if present {
        result("repo", RuleStatus::Pass, "repository marker present", None)
    } else {
        result("repo", RuleStatus::Fail, "no repository marker found", None)
    }
}

fn tracking_rule(present: bool) -> RuleResult {
    if present {
        result("tracking", RuleStatus::Pass, "tracking marker present", None)
    } else {
        result("tracking", RuleStatus::Warn, "tracking marker absent", None)
    }
}

fn document_count_rule(count: u64) -> RuleResult {
    if count >= 1 {
        result(
            "document-count",
            RuleStatus::Pass,
            format!("{count} documents found"),
            None,
        )
    } else {
        result(
            "document-count",
            RuleStatus::Fail,
            "no documents found",
            None,
        )
    }
}

/// Broken-link detection over every scanned document.
///
/// Links resolve through the standard resolver built from header-bearing
/// records, then fall back to the normalized filename stems of all scanned
/// files, so a link to a headerless document is not broken.
fn references_rule(pairs: &[(String, String)], records: &[SkillRecord]) -> RuleResult {
    if pairs.is_empty() {
        return result(
            "references",
            RuleStatus::Pass,
            "no documents to check",
            None,
        );
    }

    let resolver = RefResolver::new(records);
    let stems: BTreeSet<String> = pairs
        .iter()
        .map(|(path, _)| normalize_id(&file_stem_of(path)))
        .filter(|s| !s.is_empty())
        .collect();

    // Header-bearing documents contribute their body; a headerless file is
    // all body.
    let body_by_path: std::collections::BTreeMap<&str, &str> = records
        .iter()
        .map(|r| (r.source_path.as_str(), r.body.as_str()))
        .collect();

    let mut broken = Vec::new();
    for (path, text) in pairs {
        let body = body_by_path
            .get(path.as_str())
            .copied()
            .unwrap_or(text.as_str());
        for link in extract_wiki_links(body) {
            if resolver.resolve(&link.target).found {
                continue;
            }
            let norm = normalize_id(&link.target);
            if !norm.is_empty() && stems.contains(&norm) {
                continue;
            }
            broken.push(json!({
                "file": path,
                "target": link.target.trim(),
            }));
        }
    }

    if broken.is_empty() {
        result(
            "references",
            RuleStatus::Pass,
            "all wiki links resolve",
            None,
        )
    } else {
        result(
            "references",
            RuleStatus::Warn,
            format!("{} broken wiki links", broken.len()),
            Some(Value::Array(broken)),
        )
    }
}

fn structure_rule(records: &[SkillRecord]) -> RuleResult {
    if records.is_empty() {
        return result(
            "structure",
            RuleStatus::Pass,
            "no documents with headers to check",
            None,
        );
    }

    let missing: Vec<Value> = records
        .iter()
        .filter(|r| !has_structure_heading(&r.body))
        .map(|r| Value::String(r.source_path.clone()))
        .collect();

    if missing.is_empty() {
        result(
            "structure",
            RuleStatus::Pass,
            "all documents carry a structure heading",
            None,
        )
    } else {
        result(
            "structure",
            RuleStatus::Warn,
            format!("{} documents lack a structure heading", missing.len()),
            Some(Value::Array(missing)),
        )
    }
}

fn helpers_rule(pairs: &[(String, String)], records: &[SkillRecord]) -> RuleResult {
    let with_header = records.len();
    let helpers = pairs.len().saturating_sub(with_header);
    result(
        "helpers",
        RuleStatus::Pass,
        format!("{with_header} documents with headers, {helpers} helper documents"),
        Some(json!({
            "with_header": with_header,
            "helpers": helpers,
        })),
    )
}

fn result(
    rule_id: &str,
    status: RuleStatus,
    message: impl Into<String>,
    detail: Option<Value>,
) -> RuleResult {
    RuleResult {
        rule_id: rule_id.to_string(),
        status,
        message: message.into(),
        detail,
    }
}
