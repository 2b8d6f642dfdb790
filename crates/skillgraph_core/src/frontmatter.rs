use serde_json::Value;
use std::collections::BTreeMap;

/// Extract the metadata header from document text.
///
/// The header is the first contiguous block delimited by lines that are
/// exactly `---` (optional trailing CR, optional leading BOM on the first
/// line) at the start of the text. Returns `Some((fields, body))` when a
/// well-formed header is present, `None` otherwise: an unterminated block,
/// a YAML parse failure, or a header that is not a key/value mapping all
/// count as "no header". The document text is returned unchanged as the body
/// in the `None` case by the caller's convention.
pub fn extract_header(input: &str) -> Option<(BTreeMap<String, Value>, &str)> {
    let mut rest = input;
    let first_line_end = rest.find('\n')?;
    let first = rest[..first_line_end]
        .trim_start_matches('\u{feff}')
        .trim_end_matches('\r');
    if first != "---" {
        return None;
    }
    rest = &rest[first_line_end + 1..];

    // Walk lines until the closing delimiter; track the byte offset so the
    // body can be borrowed instead of re-joined.
    let mut offset = 0usize;
    let mut end: Option<(usize, usize)> = None; // (yaml_end, body_start)
    while offset <= rest.len() {
        let line_end = rest[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(rest.len());
        let line = rest[offset..line_end].trim_end_matches('\r');
        if line == "---" {
            let body_start = if line_end < rest.len() {
                line_end + 1
            } else {
                rest.len()
            };
            end = Some((offset, body_start));
            break;
        }
        if line_end == rest.len() {
            break;
        }
        offset = line_end + 1;
    }

    let (yaml_end, body_start) = end?;
    let raw_yaml = &rest[..yaml_end];
    let fields = parse_yaml_to_json_map(raw_yaml)?;
    Some((fields, &rest[body_start..]))
}

/// Parse a YAML fragment into a JSON-compatible map.
///
/// Goes through `serde_yaml` then converts to `serde_json::Value` so every
/// downstream coercion works over one value model. Non-mapping documents
/// (scalars, sequences, empty input) yield `None`.
fn parse_yaml_to_json_map(yaml: &str) -> Option<BTreeMap<String, Value>> {
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(yaml).ok()?;
    let json_value: Value = serde_json::to_value(yaml_value).ok()?;
    match json_value {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header() {
        let input = "---\nname: valuation-basics\ntype: skill\n---\n# Title\nBody";
        let (fields, body) = extract_header(input).unwrap();
        assert_eq!(fields["name"], Value::String("valuation-basics".into()));
        assert_eq!(fields["type"], Value::String("skill".into()));
        assert_eq!(body, "# Title\nBody");
    }

    #[test]
    fn crlf_delimiters() {
        let input = "---\r\nname: a\r\n---\r\nbody line";
        let (fields, body) = extract_header(input).unwrap();
        assert_eq!(fields["name"], Value::String("a".into()));
        assert_eq!(body, "body line");
    }

    #[test]
    fn bom_tolerated() {
        let input = "\u{feff}---\nname: a\n---\n";
        let (fields, _) = extract_header(input).unwrap();
        assert_eq!(fields["name"], Value::String("a".into()));
    }

    #[test]
    fn no_header() {
        assert!(extract_header("# Just a heading\nNo header here.").is_none());
        assert!(extract_header("").is_none());
    }

    #[test]
    fn leading_blank_line_disqualifies() {
        // The block must start at the very first line.
        assert!(extract_header("\n---\nname: a\n---\n").is_none());
    }

    #[test]
    fn unterminated_block() {
        assert!(extract_header("---\nname: a\nno closing delimiter").is_none());
    }

    #[test]
    fn empty_block_is_no_header() {
        assert!(extract_header("---\n---\nbody").is_none());
    }

    #[test]
    fn malformed_yaml_is_no_header() {
        assert!(extract_header("---\n{ not: [ valid\n---\n").is_none());
    }

    #[test]
    fn non_mapping_yaml_is_no_header() {
        assert!(extract_header("---\n- just\n- a\n- list\n---\n").is_none());
    }

    #[test]
    fn header_with_lists() {
        let input = "---\ntags:\n  - finance\n  - modeling\nrelated:\n  - other-skill\n---\n";
        let (fields, body) = extract_header(input).unwrap();
        let tags = fields["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], Value::String("finance".into()));
        assert_eq!(body, "");
    }

    #[test]
    fn closing_delimiter_at_eof_without_newline() {
        let input = "---\nname: a\n---";
        let (fields, body) = extract_header(input).unwrap();
        assert_eq!(fields["name"], Value::String("a".into()));
        assert_eq!(body, "");
    }
}
