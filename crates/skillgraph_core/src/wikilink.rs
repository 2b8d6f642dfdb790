use crate::record::WikiLink;
use regex::Regex;
use std::sync::OnceLock;

fn wiki_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap())
}

fn structure_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^#{1,3}[ \t]+(?:Description|Output|Format)\b").unwrap())
}

/// Extract every `[[target]]` / `[[target|alias]]` occurrence from body text.
///
/// The target is the substring up to the first `|`; the alias, when present,
/// is the remainder. Both are preserved raw; normalization happens in the
/// resolver.
pub fn extract_wiki_links(body: &str) -> Vec<WikiLink> {
    let mut out = Vec::new();
    for caps in wiki_link_re().captures_iter(body) {
        let inner = &caps[1];
        let (target, alias) = match inner.split_once('|') {
            Some((t, a)) => (t, Some(a.to_string())),
            None => (inner, None),
        };
        out.push(WikiLink {
            target: target.to_string(),
            alias,
        });
    }
    out
}

/// Whether the body contains a structure heading: a level 1-3 heading named
/// Description, Output, or Format (case-insensitive), anywhere in the text.
pub fn has_structure_heading(body: &str) -> bool {
    structure_heading_re().is_match(body)
}
