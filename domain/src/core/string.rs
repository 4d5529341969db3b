//! String utilities for the domain layer.

/// Single-line preview of a model text for log output (UTF-8 safe)
///
/// Newlines are collapsed to spaces and the result is cut at a character
/// boundary no later than `max_len` bytes, with an ellipsis appended.
pub fn truncate(s: &str, max_len: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.len() <= max_len {
        return flat;
    }
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &flat[..end])
}
