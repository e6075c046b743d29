//! Presentation overrides for specific words.
//!
//! Rules are data, loaded from JSON, and matched against a word's display
//! text and rendered severity. Nothing in the alignment core consults them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FeedbackError;
use crate::types::{AlignmentReport, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledPart {
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WordStyle {
    pub color: Option<String>,
    pub bold: bool,
    /// Start and end colors of a text gradient.
    pub gradient: Option<(String, String)>,
    /// Substrings rendered with their own color.
    pub parts: Vec<StyledPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    /// Case-insensitive substring the word must contain.
    pub contains: String,
    /// Only apply when the word renders with this severity.
    #[serde(default)]
    pub severity: Option<Severity>,
    pub style: WordStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleTable {
    #[serde(default)]
    pub rules: Vec<StyleRule>,
}

impl StyleTable {
    pub fn from_json(data: &str) -> Result<Self, FeedbackError> {
        serde_json::from_str(data).map_err(|e| FeedbackError::json("parse style table", e))
    }

    pub fn load(path: &Path) -> Result<Self, FeedbackError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| FeedbackError::io("read style table", e))?;
        Self::from_json(&data)
    }

    /// First rule matching `word` at `severity`, in table order.
    pub fn lookup(&self, word: &str, severity: Severity) -> Option<&WordStyle> {
        let lowered = word.to_lowercase();
        self.rules
            .iter()
            .find(|rule| {
                lowered.contains(&rule.contains.to_lowercase())
                    && rule.severity.map_or(true, |s| s == severity)
            })
            .map(|rule| &rule.style)
    }

    /// Styles for every report position that has a matching rule.
    ///
    /// A word's severity is taken from its first rendered segment.
    pub fn styles_for_report<'a>(
        &'a self,
        report: &AlignmentReport,
    ) -> BTreeMap<usize, &'a WordStyle> {
        report
            .word_comparisons
            .iter()
            .filter_map(|c| {
                let severity = report
                    .char_segments_by_word_position
                    .get(&c.position)
                    .and_then(|segments| segments.first())
                    .map_or(Severity::Normal, |s| s.severity);
                self.lookup(c.display_word(), severity)
                    .map(|style| (c.position, style))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::alignment::report::aggregate;
    use crate::types::{ComparisonStatus, WordComparison};

    const TABLE_JSON: &str = r#"{
        "rules": [
            {"contains": "technology", "style": {"color": "slate-800", "bold": true,
              "parts": [{"text": "tech", "color": "orange-500"}]}},
            {"contains": "pronunciation", "severity": "warning",
             "style": {"gradient": ["orange-400", "purple-500"]}},
            {"contains": "detailed", "severity": "error", "style": {"color": "red-600", "bold": true}}
        ]
    }"#;

    #[test]
    fn parses_table() {
        let table = StyleTable::from_json(TABLE_JSON).expect("valid table");
        assert_eq!(table.rules.len(), 3);
        assert_eq!(table.rules[0].style.parts[0].text, "tech");
        assert_eq!(
            table.rules[1].style.gradient,
            Some(("orange-400".to_string(), "purple-500".to_string()))
        );
    }

    #[test]
    fn lookup_is_case_insensitive_substring() {
        let table = StyleTable::from_json(TABLE_JSON).expect("valid table");
        let style = table
            .lookup("Technology,", Severity::Normal)
            .expect("technology rule");
        assert!(style.bold);
        assert_eq!(style.color.as_deref(), Some("slate-800"));
    }

    #[test]
    fn lookup_respects_severity_filter() {
        let table = StyleTable::from_json(TABLE_JSON).expect("valid table");
        assert!(table.lookup("pronunciation", Severity::Warning).is_some());
        assert!(table.lookup("pronunciation", Severity::Error).is_none());
        assert!(table.lookup("detailed", Severity::Error).is_some());
        assert!(table.lookup("detailed", Severity::Normal).is_none());
    }

    #[test]
    fn empty_table_matches_nothing() {
        let table = StyleTable::default();
        assert!(table.lookup("technology", Severity::Normal).is_none());
    }

    #[test]
    fn styles_for_report_uses_rendered_severity() {
        let table = StyleTable::from_json(TABLE_JSON).expect("valid table");
        let comparisons = vec![
            WordComparison {
                status: ComparisonStatus::Match,
                expected_word: Some("detailed".to_string()),
                actual_word: Some("detailed".to_string()),
                position: 0,
                is_acoustically_correct: false,
                expected_index: Some(0),
                recognized_index: Some(0),
            },
            WordComparison {
                status: ComparisonStatus::Match,
                expected_word: Some("technology".to_string()),
                actual_word: Some("technology".to_string()),
                position: 1,
                is_acoustically_correct: true,
                expected_index: Some(1),
                recognized_index: Some(1),
            },
            WordComparison {
                status: ComparisonStatus::Deletion,
                expected_word: Some("pronunciation".to_string()),
                actual_word: None,
                position: 2,
                is_acoustically_correct: true,
                expected_index: Some(2),
                recognized_index: None,
            },
        ];
        let report = aggregate(&comparisons, &BTreeMap::new());
        let styles = table.styles_for_report(&report);
        assert_eq!(styles.len(), 3);
        assert_eq!(styles[&0].color.as_deref(), Some("red-600"));
        assert!(styles[&2].gradient.is_some());
    }
}
