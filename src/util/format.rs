//! Text and number formatting utilities.

/// Truncate to at most `max_chars` characters, appending `…` when cut.
///
/// Cuts on a char boundary, so multi-byte input is never split.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Format a quota figure compactly (e.g. `1.5M`, `12.5K`).
#[must_use]
pub fn format_quota(value: i64) -> String {
    fn format_compact(value: i64, divisor: u64, suffix: &str) -> String {
        let sign = if value < 0 { "-" } else { "" };
        let abs = value.unsigned_abs();
        let major = abs / divisor;
        let minor = (abs % divisor) / (divisor / 10);
        format!("{sign}{major}.{minor}{suffix}")
    }

    // Upstream quotas are untrusted; `unsigned_abs` is total over i64.
    let magnitude = value.unsigned_abs();
    if magnitude >= 1_000_000 {
        format_compact(value, 1_000_000, "M")
    } else if magnitude >= 1_000 {
        format_compact(value, 1_000, "K")
    } else {
        value.to_string()
    }
}
