use std::path::Path;

use crate::config::{AlignmentMode, FeedbackConfig};
use crate::error::FeedbackError;
use crate::pipeline::defaults::{word_aligner_for, ProportionalPhonemeSegmenter, WhitespaceTokenizer};
use crate::pipeline::runtime::{FeedbackEngine, FeedbackEngineParts};
use crate::pipeline::traits::{PhonemeSegmenter, Tokenizer, WordAligner};

pub struct FeedbackEngineBuilder {
    config: FeedbackConfig,
    tokenizer: Option<Box<dyn Tokenizer>>,
    word_aligner: Option<Box<dyn WordAligner>>,
    phoneme_segmenter: Option<Box<dyn PhonemeSegmenter>>,
}

impl FeedbackEngineBuilder {
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            config,
            tokenizer: None,
            word_aligner: None,
            phoneme_segmenter: None,
        }
    }

    pub fn from_config_file(path: &Path) -> Result<Self, FeedbackError> {
        Ok(Self::new(FeedbackConfig::load(path)?))
    }

    pub fn with_alignment_mode(mut self, alignment_mode: AlignmentMode) -> Self {
        self.config.alignment_mode = alignment_mode;
        self
    }

    pub fn with_acoustic_error_threshold(mut self, threshold: f32) -> Self {
        self.config.acoustic_error_threshold = threshold;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Overrides the aligner chosen by `alignment_mode`.
    pub fn with_word_aligner(mut self, word_aligner: Box<dyn WordAligner>) -> Self {
        self.word_aligner = Some(word_aligner);
        self
    }

    pub fn with_phoneme_segmenter(mut self, phoneme_segmenter: Box<dyn PhonemeSegmenter>) -> Self {
        self.phoneme_segmenter = Some(phoneme_segmenter);
        self
    }

    pub fn build(self) -> Result<FeedbackEngine, FeedbackError> {
        self.config.validate()?;
        let alignment_mode = self.config.alignment_mode;

        tracing::debug!(
            alignment_mode = alignment_mode.as_str(),
            acoustic_error_threshold = self.config.acoustic_error_threshold,
            custom_word_aligner = self.word_aligner.is_some(),
            "feedback: engine built"
        );

        Ok(FeedbackEngine::from_parts(FeedbackEngineParts {
            alignment_mode,
            acoustic_error_threshold: self.config.acoustic_error_threshold,
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(WhitespaceTokenizer)),
            word_aligner: self
                .word_aligner
                .unwrap_or_else(|| word_aligner_for(alignment_mode)),
            phoneme_segmenter: self
                .phoneme_segmenter
                .unwrap_or_else(|| Box::new(ProportionalPhonemeSegmenter)),
        }))
    }
}

impl Default for FeedbackEngineBuilder {
    fn default() -> Self {
        Self::new(FeedbackConfig::default())
    }
}
