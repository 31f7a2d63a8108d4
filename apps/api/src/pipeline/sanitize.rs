//! Best-effort recovery of a single JSON object from free-form model output.
//!
//! This is deliberately not a JSON repair engine. It narrows the text to a candidate
//! object and strips trailing commas; the caller still runs a strict parser on the result.

use std::sync::LazyLock;

use regex::Regex;

/// ```json fenced block, tag case-insensitive, whitespace around the body ignored.
static JSON_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").expect("valid regex"));

/// A comma whose next non-whitespace character closes an array or object.
static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").expect("valid regex"));

/// Returns a candidate JSON object string, or `""` when no object delimiters are found.
///
/// 1. Prefer the body of a ```json fence; otherwise use the whole input.
/// 2. Keep the span from the first `{` to the last `}` (inclusive).
/// 3. Drop commas that directly precede `]` or `}`.
pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let content = JSON_FENCE_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |body| body.as_str());

    let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) else {
        return String::new();
    };
    if start >= end {
        return String::new();
    }

    TRAILING_COMMA_RE
        .replace_all(&content[start..=end], "$1")
        .into_owned()
}
