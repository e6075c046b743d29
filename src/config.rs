use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FeedbackError;

/// How expected and recognized words are paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// One-token-lookahead greedy pairing. Never emits substitutions.
    #[default]
    Greedy,
    /// Minimum word edit distance with deterministic tie-breaking.
    Optimal,
}

impl AlignmentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Optimal => "optimal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub alignment_mode: AlignmentMode,
    /// Words scored below this nativeness (and not marked correct) count as
    /// mispronounced.
    pub acoustic_error_threshold: f32,
}

impl FeedbackConfig {
    pub const DEFAULT_ACOUSTIC_ERROR_THRESHOLD: f32 = 0.7;

    pub fn load(path: &Path) -> Result<Self, FeedbackError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| FeedbackError::io("read feedback config", e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| FeedbackError::json("parse feedback config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FeedbackError> {
        let threshold = self.acoustic_error_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(FeedbackError::invalid_config(format!(
                "acoustic_error_threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(())
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            alignment_mode: AlignmentMode::Greedy,
            acoustic_error_threshold: Self::DEFAULT_ACOUSTIC_ERROR_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_config_default() {
        let config = FeedbackConfig::default();
        assert_eq!(config.alignment_mode, AlignmentMode::Greedy);
        assert!((config.acoustic_error_threshold - 0.7).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: FeedbackConfig =
            serde_json::from_str(r#"{"alignment_mode": "optimal"}"#).expect("valid config json");
        assert_eq!(config.alignment_mode, AlignmentMode::Optimal);
        assert!((config.acoustic_error_threshold - 0.7).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let config = FeedbackConfig {
            acoustic_error_threshold: 1.5,
            ..FeedbackConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FeedbackError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn load_reads_and_validates_file() {
        let path = std::env::temp_dir().join("pronunciation_feedback_config_load.json");
        std::fs::write(&path, r#"{"acoustic_error_threshold": 0.5}"#).expect("write config");
        let config = FeedbackConfig::load(&path).expect("load config");
        assert!((config.acoustic_error_threshold - 0.5).abs() < 1e-6);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_fails_on_missing_file() {
        let result = FeedbackConfig::load(Path::new("/nonexistent/feedback.json"));
        assert!(matches!(result, Err(FeedbackError::Io { .. })));
    }
}
