use std::collections::BTreeMap;

use crate::alignment::report::aggregate;
use crate::alignment::segmentation::needs_segmentation;
use crate::config::AlignmentMode;
use crate::error::FeedbackError;
use crate::pipeline::traits::{PhonemeSegmenter, Tokenizer, WordAligner};
use crate::response::ForcedAlignmentResponse;
use crate::types::{AlignmentReport, CharSegment, ComparisonStatus, Recognition, WordComparison};

/// Runs tokenization, word alignment, phoneme segmentation and aggregation
/// for one utterance at a time.
///
/// The engine keeps no per-call state, so a single instance can serve
/// concurrent requests.
pub struct FeedbackEngine {
    alignment_mode: AlignmentMode,
    acoustic_error_threshold: f32,
    tokenizer: Box<dyn Tokenizer>,
    word_aligner: Box<dyn WordAligner>,
    phoneme_segmenter: Box<dyn PhonemeSegmenter>,
}

pub(crate) struct FeedbackEngineParts {
    pub alignment_mode: AlignmentMode,
    pub acoustic_error_threshold: f32,
    pub tokenizer: Box<dyn Tokenizer>,
    pub word_aligner: Box<dyn WordAligner>,
    pub phoneme_segmenter: Box<dyn PhonemeSegmenter>,
}

impl FeedbackEngine {
    pub(crate) fn from_parts(parts: FeedbackEngineParts) -> Self {
        Self {
            alignment_mode: parts.alignment_mode,
            acoustic_error_threshold: parts.acoustic_error_threshold,
            tokenizer: parts.tokenizer,
            word_aligner: parts.word_aligner,
            phoneme_segmenter: parts.phoneme_segmenter,
        }
    }

    pub fn alignment_mode(&self) -> AlignmentMode {
        self.alignment_mode
    }

    pub fn acoustic_error_threshold(&self) -> f32 {
        self.acoustic_error_threshold
    }

    pub fn evaluate(
        &self,
        expected: &str,
        recognition: &Recognition,
    ) -> Result<AlignmentReport, FeedbackError> {
        recognition.validate()?;

        let tokens = self.tokenizer.normalize(expected);
        let comparisons =
            self.word_aligner
                .align(&tokens, &recognition.words, self.acoustic_error_threshold);
        let segments = self.segment_words(&comparisons, recognition);
        let mut report = aggregate(&comparisons, &segments);
        report.expected_text = expected.to_string();
        report.transcribed_text = recognition.transcript.clone();

        tracing::debug!(
            expected_tokens = tokens.len(),
            recognized_words = recognition.words.len(),
            phonemes = recognition.phonemes.len(),
            segmented_words = segments.len(),
            accuracy_percent = format!("{:.1}", report.accuracy_percent),
            "feedback: report built"
        );
        Ok(report)
    }

    /// Scores a plain transcription, where every recognized word is taken as
    /// acoustically correct.
    pub fn evaluate_transcript(
        &self,
        expected: &str,
        transcript: &str,
    ) -> Result<AlignmentReport, FeedbackError> {
        self.evaluate(expected, &Recognition::from_transcript(transcript))
    }

    pub fn evaluate_response(
        &self,
        expected: &str,
        response: &ForcedAlignmentResponse,
    ) -> Result<AlignmentReport, FeedbackError> {
        let recognition = response.to_recognition()?;
        self.evaluate(expected, &recognition)
    }

    fn segment_words(
        &self,
        comparisons: &[WordComparison],
        recognition: &Recognition,
    ) -> BTreeMap<usize, Vec<CharSegment>> {
        let phonemes = &recognition.phonemes;
        if !phonemes.is_empty() {
            let orphaned = phonemes
                .iter()
                .filter(|p| {
                    !recognition
                        .words
                        .iter()
                        .any(|w| p.start_index >= w.start_index && p.end_index <= w.end_index)
                })
                .count();
            if orphaned > 0 {
                tracing::warn!(
                    orphaned,
                    total = phonemes.len(),
                    "feedback: phonemes outside every recognized word span are ignored"
                );
            }
        }

        let mut segments = BTreeMap::new();
        for comparison in comparisons {
            if !matches!(
                comparison.status,
                ComparisonStatus::Match | ComparisonStatus::Substitution
            ) {
                continue;
            }
            let Some(word) = comparison
                .recognized_index
                .and_then(|idx| recognition.words.get(idx))
            else {
                continue;
            };
            if !needs_segmentation(word, phonemes, self.acoustic_error_threshold) {
                continue;
            }
            let word_segments = self.phoneme_segmenter.segment(word, phonemes);
            tracing::debug!(
                position = comparison.position,
                word = word.text.as_str(),
                segment_count = word_segments.len(),
                "feedback: phoneme segments attached"
            );
            segments.insert(comparison.position, word_segments);
        }
        segments
    }
}
