use super::ComparisonSink;
use crate::alignment::tokenization::same_word;
use crate::types::{RecognizedWord, Token, WordComparison};

/// One-token-lookahead greedy alignment.
///
/// On a mismatch the next expected token is checked against the current
/// recognized word. A hit means the speaker skipped `expected[e]`; anything
/// else consumes the recognized word as an insertion. Deeper misalignments
/// degrade into insertion/deletion cascades, and a plausible substitution is
/// always reported as an insertion followed later by a deletion.
pub(super) fn align(
    expected: &[Token],
    recognized: &[RecognizedWord],
    acoustic_error_threshold: f32,
) -> Vec<WordComparison> {
    let mut sink =
        ComparisonSink::with_capacity(expected.len() + recognized.len(), acoustic_error_threshold);
    let mut e = 0usize;
    let mut a = 0usize;

    while e < expected.len() || a < recognized.len() {
        match (expected.get(e), recognized.get(a)) {
            (Some(token), Some(word)) => {
                if same_word(&token.text, &word.text) {
                    sink.push_match(e, token, a, word);
                    e += 1;
                    a += 1;
                    continue;
                }

                let next_matches = expected
                    .get(e + 1)
                    .is_some_and(|next| same_word(&next.text, &word.text));
                if next_matches {
                    tracing::debug!(
                        expected = token.text.as_str(),
                        recognized = word.text.as_str(),
                        "word alignment: lookahead found skipped expected word"
                    );
                    sink.push_deletion(e, token);
                    e += 1;
                } else {
                    tracing::debug!(
                        expected = token.text.as_str(),
                        recognized = word.text.as_str(),
                        "word alignment: no lookahead match, treating recognized word as extra"
                    );
                    sink.push_insertion(a, word);
                    a += 1;
                }
            }
            (Some(token), None) => {
                sink.push_deletion(e, token);
                e += 1;
            }
            (None, Some(word)) => {
                sink.push_insertion(a, word);
                a += 1;
            }
            (None, None) => break,
        }
    }

    sink.finish()
}
