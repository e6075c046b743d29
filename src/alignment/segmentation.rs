use crate::types::{CharSegment, Phoneme, PhonemeGroup, RecognizedWord, Severity, WordScoreType};

/// Splits a recognized word into character segments carrying phoneme severity.
///
/// Phoneme index ranges are spread proportionally over the word's characters.
/// This is an approximation for highlighting, not a grapheme alignment: silent
/// letters and digraphs are not accounted for.
///
/// The returned segments always concatenate back to `word.text`.
pub fn segment(word: &RecognizedWord, phonemes: &[Phoneme]) -> Vec<CharSegment> {
    let chars: Vec<char> = word.text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut in_span = phonemes_in_span(word, phonemes);
    if in_span.is_empty() {
        return vec![CharSegment {
            text: word.text.clone(),
            severity: Severity::Normal,
        }];
    }
    in_span.sort_by_key(|p| p.start_index);

    let groups = group_phonemes(&in_span);
    let min_start = in_span.iter().map(|p| p.start_index).min().unwrap_or(0);
    let max_end = in_span.iter().map(|p| p.end_index).max().unwrap_or(min_start);
    let span = max_end.saturating_sub(min_start);

    if span == 0 {
        let severity = groups
            .iter()
            .map(|g| g.severity)
            .max()
            .unwrap_or(Severity::Normal);
        return vec![CharSegment {
            text: word.text.clone(),
            severity,
        }];
    }

    let segments = map_groups_to_chars(&chars, &groups, min_start, span);
    debug_assert_eq!(
        segments.iter().map(|s| s.text.as_str()).collect::<String>(),
        word.text,
        "segmentation coverage contract violated"
    );
    segments
}

/// Phonemes that fall entirely inside the word's index span, in input order.
pub fn phonemes_in_span<'a>(word: &RecognizedWord, phonemes: &'a [Phoneme]) -> Vec<&'a Phoneme> {
    phonemes
        .iter()
        .filter(|p| p.start_index >= word.start_index && p.end_index <= word.end_index)
        .collect()
}

/// Whether a word deserves phoneme-level highlighting.
///
/// Words the recognizer did not mark correct, words below the acoustic
/// threshold, and words containing any error or warning phoneme qualify, as
/// long as phoneme data exists for their span.
pub fn needs_segmentation(
    word: &RecognizedWord,
    phonemes: &[Phoneme],
    acoustic_error_threshold: f32,
) -> bool {
    let in_span = phonemes_in_span(word, phonemes);
    if in_span.is_empty() {
        return false;
    }
    word.score_type != WordScoreType::Correct
        || word.nativeness_score < acoustic_error_threshold
        || in_span.iter().any(|p| p.score_type != Severity::Normal)
}

/// Merges phonemes sorted by `start_index` into same-severity runs.
///
/// A phoneme joins the current group when its severity is unchanged and it
/// starts no later than one index past the group's end.
pub fn group_phonemes(sorted: &[&Phoneme]) -> Vec<PhonemeGroup> {
    let mut groups: Vec<PhonemeGroup> = Vec::new();
    for p in sorted {
        if let Some(current) = groups.last_mut() {
            if current.severity == p.score_type
                && p.start_index <= current.end_idx.saturating_add(1)
            {
                current.end_idx = current.end_idx.max(p.end_index);
                continue;
            }
        }
        groups.push(PhonemeGroup {
            start_idx: p.start_index,
            end_idx: p.end_index,
            severity: p.score_type,
        });
    }
    groups
}

/// Character range for one group, before clamping.
///
/// `start = floor(rel_start / span * len)`, `end = ceil((rel_end + 1) / span * len)`,
/// evaluated in `u128` so the result is exact for any `usize` index span.
fn group_char_range(group: &PhonemeGroup, min_start: usize, span: usize, len: usize) -> (usize, usize) {
    let rel_start = group.start_idx.saturating_sub(min_start) as u128;
    let rel_end = group.end_idx.saturating_sub(min_start) as u128;
    let (span, wide_len) = (span as u128, len as u128);
    let start = (rel_start * wide_len / span).min(wide_len);
    let end = ((rel_end + 1) * wide_len).div_ceil(span).min(wide_len);
    (start as usize, end as usize)
}

fn map_groups_to_chars(
    chars: &[char],
    groups: &[PhonemeGroup],
    min_start: usize,
    span: usize,
) -> Vec<CharSegment> {
    let len = chars.len();
    let mut segments = Vec::with_capacity(groups.len() * 2 + 1);
    let mut cursor = 0usize;

    for group in groups {
        let (raw_start, raw_end) = group_char_range(group, min_start, span, len);
        let start = raw_start.max(cursor);
        let end = raw_end.max(start);

        tracing::debug!(
            group_start = group.start_idx,
            group_end = group.end_idx,
            severity = group.severity.as_str(),
            start_char = start,
            end_char = end,
            "segmentation: group mapped to characters"
        );

        if cursor < start {
            push_segment(&mut segments, &chars[cursor..start], Severity::Normal);
        }
        if start < end {
            push_segment(&mut segments, &chars[start..end], group.severity);
        }
        cursor = end;
    }

    if cursor < len {
        push_segment(&mut segments, &chars[cursor..], Severity::Normal);
    }
    segments
}

/// Appends a segment, extending the previous one when the severity repeats.
fn push_segment(segments: &mut Vec<CharSegment>, chars: &[char], severity: Severity) {
    if let Some(last) = segments.last_mut() {
        if last.severity == severity {
            last.text.extend(chars);
            return;
        }
    }
    segments.push(CharSegment {
        text: chars.iter().collect(),
        severity,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: usize, end: usize) -> RecognizedWord {
        RecognizedWord {
            text: text.to_string(),
            start_index: start,
            end_index: end,
            nativeness_score: 0.5,
            score_type: WordScoreType::Incorrect,
        }
    }

    fn phoneme(start: usize, end: usize, severity: Severity) -> Phoneme {
        Phoneme {
            text: "x".to_string(),
            start_index: start,
            end_index: end,
            score_type: severity,
            nativeness_score: 0.5,
        }
    }

    fn pairs(segments: &[CharSegment]) -> Vec<(&str, Severity)> {
        segments.iter().map(|s| (s.text.as_str(), s.severity)).collect()
    }

    #[test]
    fn technology_error_prefix_then_normal() {
        let w = word("technology", 0, 9);
        let phonemes = vec![
            phoneme(0, 2, Severity::Error),
            phoneme(3, 6, Severity::Normal),
            phoneme(7, 9, Severity::Normal),
        ];
        let segments = segment(&w, &phonemes);
        assert_eq!(
            pairs(&segments),
            [("tech", Severity::Error), ("nology", Severity::Normal)]
        );
    }

    #[test]
    fn gaps_between_groups_are_filled_with_normal() {
        let w = word("abcdefghij", 0, 9);
        let phonemes = vec![
            phoneme(0, 1, Severity::Normal),
            phoneme(5, 6, Severity::Error),
            phoneme(8, 9, Severity::Normal),
        ];
        let segments = segment(&w, &phonemes);
        assert_eq!(
            pairs(&segments),
            [
                ("abcde", Severity::Normal),
                ("fgh", Severity::Error),
                ("ij", Severity::Normal),
            ]
        );
    }

    #[test]
    fn unsorted_phonemes_are_sorted_first() {
        let w = word("technology", 0, 9);
        let phonemes = vec![
            phoneme(7, 9, Severity::Normal),
            phoneme(0, 2, Severity::Error),
            phoneme(3, 6, Severity::Normal),
        ];
        let segments = segment(&w, &phonemes);
        assert_eq!(segments[0].text, "tech");
        assert_eq!(segments[0].severity, Severity::Error);
    }

    #[test]
    fn no_phonemes_in_span_yields_whole_word_normal() {
        let w = word("hello", 10, 19);
        let phonemes = vec![phoneme(0, 4, Severity::Error), phoneme(20, 25, Severity::Error)];
        assert_eq!(pairs(&segment(&w, &phonemes)), [("hello", Severity::Normal)]);
        assert_eq!(pairs(&segment(&w, &[])), [("hello", Severity::Normal)]);
    }

    #[test]
    fn zero_span_maps_whole_word_to_most_severe_group() {
        let w = word("a", 3, 3);
        let phonemes = vec![phoneme(3, 3, Severity::Normal), phoneme(3, 3, Severity::Warning)];
        assert_eq!(pairs(&segment(&w, &phonemes)), [("a", Severity::Warning)]);
    }

    #[test]
    fn empty_word_text_yields_no_segments() {
        let w = word("", 0, 3);
        assert!(segment(&w, &[phoneme(0, 3, Severity::Error)]).is_empty());
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let w = word("naïveté", 0, 6);
        let phonemes = vec![phoneme(0, 2, Severity::Warning), phoneme(3, 6, Severity::Normal)];
        let segments = segment(&w, &phonemes);
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "naïveté");
        assert_eq!(segments[0].severity, Severity::Warning);
    }

    #[test]
    fn last_group_always_reaches_word_end() {
        let w = word("pronunciation", 100, 140);
        let phonemes = vec![
            phoneme(100, 110, Severity::Normal),
            phoneme(111, 125, Severity::Warning),
            phoneme(126, 140, Severity::Error),
        ];
        let segments = segment(&w, &phonemes);
        assert_eq!(segments.last().map(|s| s.severity), Some(Severity::Error));
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "pronunciation");
    }

    #[test]
    fn huge_index_span_does_not_overflow() {
        let huge = 1usize << 62;
        let w = word("technology", 0, huge);
        let phonemes = vec![phoneme(0, 0, Severity::Error), phoneme(1, huge, Severity::Normal)];
        let segments = segment(&w, &phonemes);
        assert_eq!(
            pairs(&segments),
            [("t", Severity::Error), ("echnology", Severity::Normal)]
        );
    }

    #[test]
    fn span_ending_at_usize_max_is_covered() {
        let w = word("abcd", usize::MAX - 3, usize::MAX);
        let phonemes = vec![
            phoneme(usize::MAX - 3, usize::MAX - 2, Severity::Warning),
            phoneme(usize::MAX - 1, usize::MAX, Severity::Warning),
        ];
        assert_eq!(pairs(&segment(&w, &phonemes)), [("abcd", Severity::Warning)]);
    }

    #[test]
    fn group_merges_adjacent_same_severity() {
        let a = phoneme(0, 1, Severity::Normal);
        let b = phoneme(2, 4, Severity::Normal);
        let groups = group_phonemes(&[&a, &b]);
        assert_eq!(
            groups,
            [PhonemeGroup {
                start_idx: 0,
                end_idx: 4,
                severity: Severity::Normal
            }]
        );
    }

    #[test]
    fn group_splits_on_index_gap() {
        let a = phoneme(0, 1, Severity::Normal);
        let b = phoneme(3, 4, Severity::Normal);
        assert_eq!(group_phonemes(&[&a, &b]).len(), 2);
    }

    #[test]
    fn group_splits_on_severity_change() {
        let a = phoneme(0, 1, Severity::Normal);
        let b = phoneme(2, 3, Severity::Error);
        let groups = group_phonemes(&[&a, &b]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].severity, Severity::Error);
    }

    #[test]
    fn group_keeps_max_end_for_nested_phoneme() {
        let a = phoneme(0, 5, Severity::Error);
        let b = phoneme(2, 3, Severity::Error);
        let groups = group_phonemes(&[&a, &b]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].end_idx, 5);
    }

    #[test]
    fn needs_segmentation_policy() {
        let mut w = word("think", 0, 4);
        let normal = vec![phoneme(0, 4, Severity::Normal)];
        let warned = vec![phoneme(0, 4, Severity::Warning)];

        assert!(needs_segmentation(&w, &normal, 0.7));
        assert!(!needs_segmentation(&w, &[], 0.7));

        w.score_type = WordScoreType::Correct;
        w.nativeness_score = 0.9;
        assert!(!needs_segmentation(&w, &normal, 0.7));
        assert!(needs_segmentation(&w, &warned, 0.7));

        w.nativeness_score = 0.6;
        assert!(needs_segmentation(&w, &normal, 0.7));
    }
}
