// Shared domain helpers

use chrono::Utc;

pub fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Reduce a client-supplied file name to something safe to echo back and
/// store in metadata. Path separators and control characters are stripped,
/// the result is capped at 128 characters.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == ':' { '_' } else { c })
        .collect();
    cleaned.trim().chars().take(128).collect()
}
