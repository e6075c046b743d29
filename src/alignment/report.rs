use std::collections::BTreeMap;

use crate::types::{
    AlignmentReport, CharSegment, ComparisonStatus, PositionedWord, Severity, WordComparison,
    WordInventory, WrongWord,
};

/// Builds the report for one alignment.
///
/// Positions missing from `segments_by_position` receive a single whole-word
/// segment whose severity follows the comparison status. Entries for
/// positions that have no comparison are dropped.
pub fn aggregate(
    comparisons: &[WordComparison],
    segments_by_position: &BTreeMap<usize, Vec<CharSegment>>,
) -> AlignmentReport {
    let total_expected = comparisons
        .iter()
        .filter(|c| c.status != ComparisonStatus::Insertion)
        .count();
    let total_correct = comparisons.iter().filter(|c| c.is_correct()).count();
    let accuracy_percent = accuracy_percent(total_correct, total_expected);

    let mut char_segments_by_word_position = BTreeMap::new();
    for comparison in comparisons {
        let segments = segments_by_position
            .get(&comparison.position)
            .cloned()
            .unwrap_or_else(|| vec![fallback_segment(comparison)]);
        char_segments_by_word_position.insert(comparison.position, segments);
    }
    let dropped = segments_by_position
        .keys()
        .filter(|pos| !char_segments_by_word_position.contains_key(pos))
        .count();
    if dropped > 0 {
        tracing::debug!(dropped, "report: ignored segments for unknown positions");
    }

    let inventory = build_inventory(comparisons);
    let feedback_summary = build_summary(&inventory, total_correct, total_expected, accuracy_percent);
    let notes = build_notes(comparisons);

    AlignmentReport {
        expected_text: String::new(),
        transcribed_text: None,
        accuracy_percent,
        total_expected: to_u32(total_expected),
        total_correct: to_u32(total_correct),
        word_comparisons: comparisons.to_vec(),
        char_segments_by_word_position,
        feedback_summary,
        inventory,
        notes,
    }
}

fn accuracy_percent(correct: usize, expected: usize) -> f64 {
    if expected == 0 {
        return 0.0;
    }
    correct as f64 / expected as f64 * 100.0
}

/// Whole-word segment used when no phoneme breakdown exists for a position.
pub fn fallback_segment(comparison: &WordComparison) -> CharSegment {
    let severity = match comparison.status {
        ComparisonStatus::Match if comparison.is_acoustically_correct => Severity::Normal,
        ComparisonStatus::Match | ComparisonStatus::Substitution => Severity::Error,
        ComparisonStatus::Deletion | ComparisonStatus::Insertion => Severity::Warning,
    };
    // Phoneme segments are cut from the recognized text, so fallbacks use it too.
    let text = match comparison.status {
        ComparisonStatus::Deletion => comparison.expected_word.clone(),
        _ => comparison
            .actual_word
            .clone()
            .or_else(|| comparison.expected_word.clone()),
    };
    CharSegment {
        text: text.unwrap_or_default(),
        severity,
    }
}

fn build_inventory(comparisons: &[WordComparison]) -> WordInventory {
    let mut inventory = WordInventory::default();
    for c in comparisons {
        let expected = c.expected_word.clone().unwrap_or_default();
        let actual = c.actual_word.clone().unwrap_or_default();
        if c.is_correct() {
            inventory.correct.push(PositionedWord {
                word: expected,
                position: c.position,
            });
        } else if c.is_wrong() {
            inventory.wrong.push(WrongWord {
                expected,
                actual,
                position: c.position,
            });
        } else if c.status == ComparisonStatus::Deletion {
            inventory.missing.push(PositionedWord {
                word: expected,
                position: c.position,
            });
        } else {
            inventory.extra.push(PositionedWord {
                word: actual,
                position: c.position,
            });
        }
    }
    inventory
}

fn build_summary(
    inventory: &WordInventory,
    total_correct: usize,
    total_expected: usize,
    accuracy_percent: f64,
) -> String {
    let mut lines = vec![format!(
        "Correct words: {total_correct}/{total_expected} ({accuracy_percent:.1}%)"
    )];
    if !inventory.wrong.is_empty() {
        lines.push(format!("Wrong/Mispronounced words: {}", inventory.wrong.len()));
    }
    if !inventory.missing.is_empty() {
        lines.push(format!("Missing words: {}", inventory.missing.len()));
    }
    if !inventory.extra.is_empty() {
        lines.push(format!("Extra words: {}", inventory.extra.len()));
    }
    lines.join("\n")
}

/// Machine-readable diagnostics.
///
/// `insertions_before_pending_expected` counts extra words emitted while
/// expected words were still unconsumed; under greedy alignment these are
/// the places where a substitution may have been reported as an
/// insertion/deletion pair.
fn build_notes(comparisons: &[WordComparison]) -> Vec<String> {
    let mut notes = Vec::new();
    if comparisons.is_empty() {
        notes.push("no_comparisons".to_string());
        return notes;
    }

    let mut expected_pending = false;
    let mut suspicious = 0usize;
    for c in comparisons.iter().rev() {
        if c.status == ComparisonStatus::Insertion && expected_pending {
            suspicious += 1;
        }
        if c.expected_word.is_some() {
            expected_pending = true;
        }
    }
    if suspicious > 0 {
        notes.push(format!("insertions_before_pending_expected={suspicious}"));
    }
    notes
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
