use crate::config::{AlignmentMode, FeedbackConfig};
use crate::types::{ComparisonStatus, RecognizedWord, Token, WordComparison, WordScoreType};

mod greedy;
mod optimal;

/// Aligns expected tokens against recognized words with the greedy
/// one-token-lookahead policy and the default acoustic threshold.
pub fn align(expected: &[Token], recognized: &[RecognizedWord]) -> Vec<WordComparison> {
    align_with_mode(
        expected,
        recognized,
        AlignmentMode::Greedy,
        FeedbackConfig::DEFAULT_ACOUSTIC_ERROR_THRESHOLD,
    )
}

pub fn align_with_mode(
    expected: &[Token],
    recognized: &[RecognizedWord],
    mode: AlignmentMode,
    acoustic_error_threshold: f32,
) -> Vec<WordComparison> {
    let comparisons = match mode {
        AlignmentMode::Greedy => greedy::align(expected, recognized, acoustic_error_threshold),
        AlignmentMode::Optimal => optimal::align(expected, recognized, acoustic_error_threshold),
    };

    tracing::debug!(
        mode = mode.as_str(),
        expected_count = expected.len(),
        recognized_count = recognized.len(),
        comparison_count = comparisons.len(),
        "word alignment: done"
    );
    comparisons
}

/// A recognized word passes when the recognizer marked it correct or its
/// nativeness reaches the threshold.
pub fn is_acoustically_correct(word: &RecognizedWord, acoustic_error_threshold: f32) -> bool {
    word.score_type == WordScoreType::Correct || word.nativeness_score >= acoustic_error_threshold
}

/// Collects comparisons in consumption order and numbers their positions.
struct ComparisonSink {
    out: Vec<WordComparison>,
    acoustic_error_threshold: f32,
}

impl ComparisonSink {
    fn with_capacity(capacity: usize, acoustic_error_threshold: f32) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            acoustic_error_threshold,
        }
    }

    fn push_match(&mut self, e: usize, token: &Token, a: usize, word: &RecognizedWord) {
        let is_acoustically_correct = is_acoustically_correct(word, self.acoustic_error_threshold);
        if !is_acoustically_correct {
            tracing::debug!(
                word = word.text.as_str(),
                nativeness_score = word.nativeness_score,
                "word alignment: matched word below acoustic threshold"
            );
        }
        self.push(
            ComparisonStatus::Match,
            Some((e, token)),
            Some((a, word)),
            is_acoustically_correct,
        );
    }

    fn push_substitution(&mut self, e: usize, token: &Token, a: usize, word: &RecognizedWord) {
        self.push(
            ComparisonStatus::Substitution,
            Some((e, token)),
            Some((a, word)),
            true,
        );
    }

    fn push_deletion(&mut self, e: usize, token: &Token) {
        self.push(ComparisonStatus::Deletion, Some((e, token)), None, true);
    }

    fn push_insertion(&mut self, a: usize, word: &RecognizedWord) {
        self.push(ComparisonStatus::Insertion, None, Some((a, word)), true);
    }

    fn push(
        &mut self,
        status: ComparisonStatus,
        expected: Option<(usize, &Token)>,
        recognized: Option<(usize, &RecognizedWord)>,
        is_acoustically_correct: bool,
    ) {
        self.out.push(WordComparison {
            status,
            expected_word: expected.map(|(_, t)| t.display_text.clone()),
            actual_word: recognized.map(|(_, w)| w.text.clone()),
            position: self.out.len(),
            is_acoustically_correct,
            expected_index: expected.map(|(idx, _)| idx),
            recognized_index: recognized.map(|(idx, _)| idx),
        });
    }

    fn finish(self) -> Vec<WordComparison> {
        self.out
    }
}
