//! Wire model of the external forced-alignment service.
//!
//! The service owns this format; only the fields the engine reads are
//! modelled. Conversion into [`Recognition`] rejects shapes the engine
//! cannot repair (missing word text, negative indices).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FeedbackError;
use crate::types::{Phoneme, RecognizedWord, Recognition, Severity, WordScoreType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForcedAlignmentResponse {
    pub sentence: Option<String>,
    #[serde(default)]
    pub words: Vec<WordData>,
    #[serde(default)]
    pub phonemes: Vec<PhonemeData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordData {
    pub word: Option<String>,
    /// Original spelling as written in the expected text; preferred for display.
    pub word_orig: Option<String>,
    pub start_index: i64,
    pub end_index: i64,
    pub score_type: WordScoreType,
    pub nativeness_score: Option<f32>,
    /// User-calibrated score; wins over `nativeness_score` when present.
    pub nativeness_score_user: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonemeData {
    #[serde(alias = "text")]
    pub phoneme: Option<String>,
    pub start_index: i64,
    pub end_index: i64,
    pub score_type: Severity,
    pub nativeness_score: Option<f32>,
}

impl ForcedAlignmentResponse {
    pub fn from_json(data: &str) -> Result<Self, FeedbackError> {
        serde_json::from_str(data)
            .map_err(|e| FeedbackError::json("parse forced alignment response", e))
    }

    pub fn load(path: &Path) -> Result<Self, FeedbackError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| FeedbackError::io("read forced alignment response", e))?;
        Self::from_json(&data)
    }

    /// Converts to engine input and validates the result.
    pub fn to_recognition(&self) -> Result<Recognition, FeedbackError> {
        let words = self
            .words
            .iter()
            .enumerate()
            .map(|(idx, w)| w.to_recognized_word(idx))
            .collect::<Result<Vec<_>, _>>()?;
        let phonemes = self
            .phonemes
            .iter()
            .enumerate()
            .map(|(idx, p)| p.to_phoneme(idx))
            .collect::<Result<Vec<_>, _>>()?;

        let recognition = Recognition {
            words,
            phonemes,
            transcript: self.sentence.clone(),
        };
        recognition.validate()?;
        Ok(recognition)
    }
}

impl WordData {
    fn to_recognized_word(&self, idx: usize) -> Result<RecognizedWord, FeedbackError> {
        let text = self
            .word_orig
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.word.as_deref())
            .ok_or_else(|| FeedbackError::malformed(format!("word {idx} has no text")))?;
        Ok(RecognizedWord {
            text: text.to_string(),
            start_index: to_index("word", idx, self.start_index)?,
            end_index: to_index("word", idx, self.end_index)?,
            nativeness_score: self
                .nativeness_score_user
                .or(self.nativeness_score)
                .unwrap_or(0.0),
            score_type: self.score_type,
        })
    }
}

impl PhonemeData {
    fn to_phoneme(&self, idx: usize) -> Result<Phoneme, FeedbackError> {
        Ok(Phoneme {
            text: self.phoneme.clone().unwrap_or_default(),
            start_index: to_index("phoneme", idx, self.start_index)?,
            end_index: to_index("phoneme", idx, self.end_index)?,
            score_type: self.score_type,
            nativeness_score: self.nativeness_score.unwrap_or(0.0),
        })
    }
}

fn to_index(kind: &str, idx: usize, value: i64) -> Result<usize, FeedbackError> {
    if value < 0 {
        return Err(FeedbackError::malformed(format!(
            "{kind} {idx} has negative index {value}"
        )));
    }
    usize::try_from(value).map_err(|_| {
        FeedbackError::malformed(format!("{kind} {idx} has index {value} out of range"))
    })
}
