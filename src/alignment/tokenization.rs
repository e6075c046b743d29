use crate::types::Token;

/// Splits a phrase into word tokens.
///
/// Whitespace runs separate tokens and empty tokens are dropped. `text` is
/// lower-cased for comparison while `display_text` keeps the original casing.
pub fn normalize(phrase: &str) -> Vec<Token> {
    let tokens: Vec<Token> = phrase
        .split_whitespace()
        .enumerate()
        .map(|(ordinal, word)| Token {
            text: word.to_lowercase(),
            display_text: word.to_string(),
            ordinal,
        })
        .collect();

    debug_assert!(
        tokens.iter().all(|t| !t.text.is_empty()),
        "tokenization produced an empty token"
    );

    tokens
}

/// Case-insensitive word equality used by every aligner.
pub(crate) fn same_word(normalized: &str, recognized: &str) -> bool {
    normalized == recognized.to_lowercase()
}
