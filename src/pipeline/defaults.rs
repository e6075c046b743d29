use crate::alignment::segmentation::segment;
use crate::alignment::tokenization::normalize;
use crate::alignment::word_alignment::align_with_mode;
use crate::config::AlignmentMode;
use crate::pipeline::traits::{PhonemeSegmenter, Tokenizer, WordAligner};
use crate::types::{CharSegment, Phoneme, RecognizedWord, Token, WordComparison};

pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn normalize(&self, phrase: &str) -> Vec<Token> {
        normalize(phrase)
    }
}

pub struct GreedyWordAligner;

impl WordAligner for GreedyWordAligner {
    fn align(
        &self,
        expected: &[Token],
        recognized: &[RecognizedWord],
        acoustic_error_threshold: f32,
    ) -> Vec<WordComparison> {
        align_with_mode(
            expected,
            recognized,
            AlignmentMode::Greedy,
            acoustic_error_threshold,
        )
    }
}

pub struct OptimalWordAligner;

impl WordAligner for OptimalWordAligner {
    fn align(
        &self,
        expected: &[Token],
        recognized: &[RecognizedWord],
        acoustic_error_threshold: f32,
    ) -> Vec<WordComparison> {
        align_with_mode(
            expected,
            recognized,
            AlignmentMode::Optimal,
            acoustic_error_threshold,
        )
    }
}

pub struct ProportionalPhonemeSegmenter;

impl PhonemeSegmenter for ProportionalPhonemeSegmenter {
    fn segment(&self, word: &RecognizedWord, phonemes: &[Phoneme]) -> Vec<CharSegment> {
        segment(word, phonemes)
    }
}

pub(crate) fn word_aligner_for(mode: AlignmentMode) -> Box<dyn WordAligner> {
    match mode {
        AlignmentMode::Greedy => Box::new(GreedyWordAligner),
        AlignmentMode::Optimal => Box::new(OptimalWordAligner),
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{Severity, WordScoreType};

    use super::*;

    fn recognized(text: &str) -> RecognizedWord {
        RecognizedWord {
            text: text.to_string(),
            start_index: 0,
            end_index: 4,
            nativeness_score: 0.9,
            score_type: WordScoreType::Correct,
        }
    }

    #[test]
    fn whitespace_tokenizer_normalize() {
        let tokens = WhitespaceTokenizer.normalize("Hello  World");
        assert_eq!(tokens, normalize("Hello  World"));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn greedy_word_aligner_align() {
        let expected = normalize("hello");
        let words = vec![recognized("hello")];
        let out = GreedyWordAligner.align(&expected, &words, 0.7);
        assert_eq!(
            out,
            align_with_mode(&expected, &words, AlignmentMode::Greedy, 0.7)
        );
    }

    #[test]
    fn optimal_word_aligner_align() {
        let expected = normalize("hello there");
        let words = vec![recognized("hullo"), recognized("there")];
        let out = OptimalWordAligner.align(&expected, &words, 0.7);
        assert_eq!(
            out,
            align_with_mode(&expected, &words, AlignmentMode::Optimal, 0.7)
        );
    }

    #[test]
    fn proportional_phoneme_segmenter_segment() {
        let word = recognized("hello");
        let phonemes = vec![Phoneme {
            text: "h".to_string(),
            start_index: 0,
            end_index: 4,
            score_type: Severity::Warning,
            nativeness_score: 0.4,
        }];
        let out = ProportionalPhonemeSegmenter.segment(&word, &phonemes);
        assert_eq!(out, segment(&word, &phonemes));
        assert_eq!(out[0].severity, Severity::Warning);
    }

    #[test]
    fn word_aligner_for_mode() {
        let expected = normalize("a b c d");
        let words = vec![recognized("a"), recognized("d")];
        let greedy = word_aligner_for(AlignmentMode::Greedy).align(&expected, &words, 0.7);
        let optimal = word_aligner_for(AlignmentMode::Optimal).align(&expected, &words, 0.7);
        assert_eq!(greedy.len(), 5);
        assert_eq!(optimal.len(), 4);
    }
}
