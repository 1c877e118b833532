//! Cleanup for free-text fields that arrive with embedded markup.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Opening, closing and self-closing tags plus comments.
    Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^<>]*>").expect("tag regex is valid")
});

/// Strips markup tags, decodes HTML entities, then removes `\n`, `\t`
/// and `\r`.
pub fn cleanup(input: &str) -> String {
    let stripped = TAG_PATTERN.replace_all(input, "");
    let unescaped = html_escape::decode_html_entities(&stripped);
    unescaped
        .chars()
        .filter(|c| !matches!(c, '\n' | '\t' | '\r'))
        .collect()
}
