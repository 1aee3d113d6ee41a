//! Free-text tokenizer for search queries and candidate names.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Normalize free text into lowercase word tokens.
///
/// Lowercases, strips everything that is not a word character or
/// whitespace, splits on whitespace runs, and drops empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    stripped
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}
