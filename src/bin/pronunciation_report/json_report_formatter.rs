use std::io::Write;

use pronunciation_feedback::AlignmentReport;

pub fn write_report(out: &mut dyn Write, report: &AlignmentReport) -> Result<(), String> {
    serde_json::to_writer_pretty(&mut *out, report)
        .map_err(|err| format!("Failed to serialize report JSON: {err}"))?;
    out.write_all(b"\n")
        .map_err(|err| format!("Failed to finalize report output: {err}"))?;
    Ok(())
}
