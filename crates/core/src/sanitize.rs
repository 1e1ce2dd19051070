//! Upload file-name sanitizing.
//!
//! Names coming from a browser are untrusted. Path separators must not reach
//! the object namespace, and the stored name should be safe to put in a URL.

use unicode_normalization::UnicodeNormalization;

/// Reduce an uploaded file name to `[A-Za-z0-9_.-]`.
///
/// The name is NFKD-decomposed so accented letters keep their base letter.
/// Anything still outside ASCII is dropped, path separators become
/// whitespace, runs of whitespace collapse to a single `_`, and leading or
/// trailing `.` / `_` are trimmed. Returns `None` when nothing usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let spaced: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
