/// Normalize a raw name or reference into a stable identifier.
///
/// Steps: trim, ASCII-lowercase, strip one trailing `.md` (any case), replace
/// every maximal run of characters outside `[a-z0-9]` with a single `-`, then
/// strip leading/trailing dashes. Non-ASCII alphanumerics fall outside the
/// alphabet and are replaced; the loss is deliberate.
///
/// The result may be empty; callers treat an empty id as "unknown".
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let lowered = trimmed.to_ascii_lowercase();
    let stem = lowered
        .strip_suffix(".md")
        .unwrap_or(lowered.as_str());

    let mut out = String::with_capacity(stem.len());
    let mut last_dash = false;
    for ch in stem.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            last_dash = false;
        } else if !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
