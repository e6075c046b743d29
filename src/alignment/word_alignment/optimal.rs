use super::ComparisonSink;
use crate::alignment::tokenization::same_word;
use crate::types::{RecognizedWord, Token, WordComparison};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Match,
    Substitution,
    Deletion,
    Insertion,
}

/// Word-level edit distance alignment with unit costs.
///
/// The backtrace walks from the end and prefers match, then insertion, then
/// deletion, then substitution among moves that stay on an optimal path.
/// Trailing extra words therefore surface as insertions while earlier pairs
/// become substitutions.
pub(super) fn align(
    expected: &[Token],
    recognized: &[RecognizedWord],
    acoustic_error_threshold: f32,
) -> Vec<WordComparison> {
    let e_len = expected.len();
    let a_len = recognized.len();
    let width = a_len + 1;
    let mut cost = vec![0u32; (e_len + 1) * width];

    for j in 0..=a_len {
        cost[j] = j as u32;
    }
    for i in 1..=e_len {
        let row = i * width;
        let prev_row = (i - 1) * width;
        cost[row] = i as u32;
        for j in 1..=a_len {
            let diag = cost[prev_row + j - 1]
                + u32::from(!same_word(&expected[i - 1].text, &recognized[j - 1].text));
            let del = cost[prev_row + j] + 1;
            let ins = cost[row + j - 1] + 1;
            cost[row + j] = diag.min(del).min(ins);
        }
    }

    let mut steps = Vec::with_capacity(e_len + a_len);
    let (mut i, mut j) = (e_len, a_len);
    while i > 0 || j > 0 {
        let here = cost[i * width + j];
        let step = if i > 0
            && j > 0
            && same_word(&expected[i - 1].text, &recognized[j - 1].text)
            && here == cost[(i - 1) * width + j - 1]
        {
            Step::Match
        } else if j > 0 && here == cost[i * width + j - 1] + 1 {
            Step::Insertion
        } else if i > 0 && here == cost[(i - 1) * width + j] + 1 {
            Step::Deletion
        } else {
            Step::Substitution
        };

        match step {
            Step::Match | Step::Substitution => {
                i -= 1;
                j -= 1;
            }
            Step::Deletion => i -= 1,
            Step::Insertion => j -= 1,
        }
        steps.push((step, i, j));
    }

    tracing::debug!(
        edit_distance = cost[e_len * width + a_len],
        "word alignment: optimal path recovered"
    );

    let mut sink = ComparisonSink::with_capacity(steps.len(), acoustic_error_threshold);
    for &(step, e, a) in steps.iter().rev() {
        match step {
            Step::Match => sink.push_match(e, &expected[e], a, &recognized[a]),
            Step::Substitution => sink.push_substitution(e, &expected[e], a, &recognized[a]),
            Step::Deletion => sink.push_deletion(e, &expected[e]),
            Step::Insertion => sink.push_insertion(a, &recognized[a]),
        }
    }
    sink.finish()
}
