use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FeedbackError;

/// One word of a phrase after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lower-cased comparison form.
    pub text: String,
    /// Original casing, used for rendering.
    pub display_text: String,
    pub ordinal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordScoreType {
    Correct,
    Incorrect,
    AlmostCorrect,
}

/// Severity of a phoneme or of a rendered character segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One word reported by the external recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedWord {
    pub text: String,
    /// Inclusive range `[start_index, end_index]` in the recognizer's index space.
    pub start_index: usize,
    pub end_index: usize,
    /// Closeness to a reference pronunciation in `[0, 1]`.
    pub nativeness_score: f32,
    pub score_type: WordScoreType,
}

/// One phoneme reported by the external aligner.
///
/// Indices share the index space of [`RecognizedWord`] spans; they are not
/// character offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Phoneme {
    pub text: String,
    pub start_index: usize,
    pub end_index: usize,
    pub score_type: Severity,
    pub nativeness_score: f32,
}

/// Recognizer output for one utterance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recognition {
    pub words: Vec<RecognizedWord>,
    pub phonemes: Vec<Phoneme>,
    pub transcript: Option<String>,
}

impl Recognition {
    /// Builds a recognition from a plain transcribed phrase.
    ///
    /// Every word is scored `Correct` with a nativeness of 1.0 and spans its
    /// inclusive character offsets in `transcript`. No phoneme data exists.
    pub fn from_transcript(transcript: &str) -> Self {
        let mut words = Vec::new();
        let mut current = String::new();
        let mut start = 0usize;

        let flush = |current: &mut String, start: usize, words: &mut Vec<RecognizedWord>| {
            if current.is_empty() {
                return;
            }
            let len = current.chars().count();
            words.push(RecognizedWord {
                text: std::mem::take(current),
                start_index: start,
                end_index: start + len - 1,
                nativeness_score: 1.0,
                score_type: WordScoreType::Correct,
            });
        };

        for (offset, c) in transcript.chars().enumerate() {
            if c.is_whitespace() {
                flush(&mut current, start, &mut words);
                continue;
            }
            if current.is_empty() {
                start = offset;
            }
            current.push(c);
        }
        flush(&mut current, start, &mut words);

        Self {
            words,
            phonemes: Vec::new(),
            transcript: Some(transcript.to_string()),
        }
    }

    /// Rejects shapes no fallback can repair.
    ///
    /// Phoneme order is not checked: segmentation sorts phonemes itself.
    pub fn validate(&self) -> Result<(), FeedbackError> {
        let mut prev_start: Option<usize> = None;
        for (idx, word) in self.words.iter().enumerate() {
            if word.start_index > word.end_index {
                return Err(FeedbackError::malformed(format!(
                    "word {idx} ('{}') has inverted indices {}..{}",
                    word.text, word.start_index, word.end_index
                )));
            }
            check_score("word", idx, word.nativeness_score)?;
            if prev_start.is_some_and(|prev| word.start_index < prev) {
                return Err(FeedbackError::malformed(format!(
                    "word {idx} ('{}') starts before the previous word",
                    word.text
                )));
            }
            prev_start = Some(word.start_index);
        }

        for (idx, phoneme) in self.phonemes.iter().enumerate() {
            if phoneme.start_index > phoneme.end_index {
                return Err(FeedbackError::malformed(format!(
                    "phoneme {idx} ('{}') has inverted indices {}..{}",
                    phoneme.text, phoneme.start_index, phoneme.end_index
                )));
            }
            check_score("phoneme", idx, phoneme.nativeness_score)?;
        }
        Ok(())
    }
}

fn check_score(kind: &str, idx: usize, score: f32) -> Result<(), FeedbackError> {
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(FeedbackError::malformed(format!(
            "{kind} {idx} has nativeness score {score} outside [0, 1]"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    Match,
    Substitution,
    Deletion,
    Insertion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordComparison {
    pub status: ComparisonStatus,
    pub expected_word: Option<String>,
    pub actual_word: Option<String>,
    /// Index in the merged comparison sequence.
    pub position: usize,
    /// False only for a `Match` whose recognized word scored below the
    /// acoustic threshold without a `Correct` score type.
    pub is_acoustically_correct: bool,
    pub expected_index: Option<usize>,
    pub recognized_index: Option<usize>,
}

impl WordComparison {
    /// Whether the word counts towards the correct total.
    pub fn is_correct(&self) -> bool {
        self.status == ComparisonStatus::Match && self.is_acoustically_correct
    }

    /// Wrong word or mispronounced match.
    pub fn is_wrong(&self) -> bool {
        match self.status {
            ComparisonStatus::Substitution => true,
            ComparisonStatus::Match => !self.is_acoustically_correct,
            ComparisonStatus::Deletion | ComparisonStatus::Insertion => false,
        }
    }

    /// Text shown for this position: the expected word when present.
    pub fn display_word(&self) -> &str {
        self.expected_word
            .as_deref()
            .or(self.actual_word.as_deref())
            .unwrap_or("")
    }
}

/// Contiguous run of same-severity phonemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonemeGroup {
    pub start_idx: usize,
    pub end_idx: usize,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharSegment {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionedWord {
    pub word: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrongWord {
    pub expected: String,
    pub actual: String,
    pub position: usize,
}

/// Error inventory grouped by category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WordInventory {
    pub correct: Vec<PositionedWord>,
    pub wrong: Vec<WrongWord>,
    pub missing: Vec<PositionedWord>,
    pub extra: Vec<PositionedWord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentReport {
    /// Phrase the user was asked to say. Empty when built by [`aggregate`]
    /// alone.
    ///
    /// [`aggregate`]: crate::alignment::report::aggregate
    pub expected_text: String,
    /// Recognizer transcript, when the input carried one.
    pub transcribed_text: Option<String>,
    pub accuracy_percent: f64,
    pub total_expected: u32,
    pub total_correct: u32,
    pub word_comparisons: Vec<WordComparison>,
    pub char_segments_by_word_position: BTreeMap<usize, Vec<CharSegment>>,
    pub feedback_summary: String,
    pub inventory: WordInventory,
    pub notes: Vec<String>,
}
