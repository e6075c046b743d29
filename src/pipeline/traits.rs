use crate::types::{CharSegment, Phoneme, RecognizedWord, Token, WordComparison};

pub trait Tokenizer: Send + Sync {
    fn normalize(&self, phrase: &str) -> Vec<Token>;
}

pub trait WordAligner: Send + Sync {
    fn align(
        &self,
        expected: &[Token],
        recognized: &[RecognizedWord],
        acoustic_error_threshold: f32,
    ) -> Vec<WordComparison>;
}

/// Maps phoneme scores onto character ranges of one word.
///
/// Implementations must return segments that concatenate to `word.text`.
pub trait PhonemeSegmenter: Send + Sync {
    fn segment(&self, word: &RecognizedWord, phonemes: &[Phoneme]) -> Vec<CharSegment>;
}
