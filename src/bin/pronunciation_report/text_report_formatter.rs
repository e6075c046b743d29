use std::io::Write;

use pronunciation_feedback::{AlignmentReport, ComparisonStatus, StyleTable};

fn status_label(status: ComparisonStatus) -> &'static str {
    match status {
        ComparisonStatus::Match => "match",
        ComparisonStatus::Substitution => "substitution",
        ComparisonStatus::Deletion => "missing",
        ComparisonStatus::Insertion => "extra",
    }
}

/// One line per position: status, word, then `text<severity>` segments.
pub fn write_report(
    out: &mut dyn Write,
    report: &AlignmentReport,
    styles: &StyleTable,
) -> Result<(), String> {
    let write_err = |err: std::io::Error| format!("Failed to write text report: {err}");
    let styled = styles.styles_for_report(report);

    writeln!(out, "expected:    {}", report.expected_text).map_err(write_err)?;
    if let Some(transcript) = report.transcribed_text.as_deref() {
        writeln!(out, "transcribed: {transcript}").map_err(write_err)?;
    }
    writeln!(out).map_err(write_err)?;

    for comparison in &report.word_comparisons {
        let mut label = status_label(comparison.status).to_string();
        if comparison.status == ComparisonStatus::Match && !comparison.is_acoustically_correct {
            label.push_str("(mispronounced)");
        }
        let segments = report
            .char_segments_by_word_position
            .get(&comparison.position)
            .map(|segments| {
                segments
                    .iter()
                    .map(|s| format!("{}<{}>", s.text, s.severity.as_str()))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        write!(
            out,
            "{:>3}  {:<22} {:<16} {}",
            comparison.position,
            label,
            comparison.display_word(),
            segments
        )
        .map_err(write_err)?;
        if let Some(style) = styled.get(&comparison.position) {
            if let Some(color) = style.color.as_deref() {
                write!(out, "  [style: {color}]").map_err(write_err)?;
            } else if style.gradient.is_some() {
                write!(out, "  [style: gradient]").map_err(write_err)?;
            }
        }
        writeln!(out).map_err(write_err)?;
    }

    writeln!(out).map_err(write_err)?;
    writeln!(out, "{}", report.feedback_summary).map_err(write_err)?;
    for note in &report.notes {
        writeln!(out, "note: {note}").map_err(write_err)?;
    }
    Ok(())
}
