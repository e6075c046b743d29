use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use pronunciation_feedback::{
    AlignmentMode, AlignmentReport, FeedbackEngine, FeedbackEngineBuilder,
    ForcedAlignmentResponse, StyleTable,
};
use tracing_subscriber::EnvFilter;

#[path = "pronunciation_report/json_report_formatter.rs"]
mod json_report_formatter;
#[path = "pronunciation_report/text_report_formatter.rs"]
mod text_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeChoice {
    Greedy,
    Optimal,
}

impl ModeChoice {
    fn alignment_mode(self) -> AlignmentMode {
        match self {
            Self::Greedy => AlignmentMode::Greedy,
            Self::Optimal => AlignmentMode::Optimal,
        }
    }
}

/// Scores a recognition result against the sentence the user meant to say.
#[derive(Debug, Parser)]
#[command(name = "pronunciation_report")]
struct Args {
    /// Sentence the user was asked to read.
    #[arg(long, env = "PRONUNCIATION_REPORT_EXPECTED")]
    expected: String,
    /// Forced-alignment service response (JSON).
    #[arg(long, env = "PRONUNCIATION_REPORT_RESPONSE", conflicts_with = "transcript")]
    response: Option<PathBuf>,
    /// Plain transcription; every word is treated as well pronounced.
    #[arg(long, env = "PRONUNCIATION_REPORT_TRANSCRIPT")]
    transcript: Option<String>,
    #[arg(long, env = "PRONUNCIATION_REPORT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "PRONUNCIATION_REPORT_MODE", value_enum)]
    mode: Option<ModeChoice>,
    #[arg(long, env = "PRONUNCIATION_REPORT_THRESHOLD")]
    threshold: Option<f32>,
    /// Word style table (JSON), used by the text format.
    #[arg(long, env = "PRONUNCIATION_REPORT_STYLES")]
    styles: Option<PathBuf>,
    #[arg(
        long,
        env = "PRONUNCIATION_REPORT_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    format: OutputFormat,
    /// Output file; stdout when omitted.
    #[arg(long, env = "PRONUNCIATION_REPORT_OUT")]
    out: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let engine = build_engine(&args)?;
    tracing::info!(
        mode = engine.alignment_mode().as_str(),
        threshold = engine.acoustic_error_threshold(),
        "pronunciation_report: engine ready"
    );

    let report = evaluate(&engine, &args)?;
    tracing::info!(
        accuracy_percent = format!("{:.1}", report.accuracy_percent),
        total_expected = report.total_expected,
        total_correct = report.total_correct,
        "pronunciation_report: evaluated"
    );

    let styles = match args.styles.as_deref() {
        Some(path) => StyleTable::load(path)
            .map_err(|err| format!("Failed to load styles {}: {err}", path.display()))?,
        None => StyleTable::default(),
    };

    match args.out.as_deref() {
        Some(path) => {
            let mut file = create_out_file(path)?;
            write_output(&mut file, &report, &styles, args.format)?;
            println!("Wrote pronunciation report to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_output(&mut lock, &report, &styles, args.format)?;
        }
    }
    Ok(())
}

fn build_engine(args: &Args) -> Result<FeedbackEngine, String> {
    let mut builder = match args.config.as_deref() {
        Some(path) => FeedbackEngineBuilder::from_config_file(path)
            .map_err(|err| format!("Failed to load config {}: {err}", path.display()))?,
        None => FeedbackEngineBuilder::default(),
    };
    if let Some(mode) = args.mode {
        builder = builder.with_alignment_mode(mode.alignment_mode());
    }
    if let Some(threshold) = args.threshold {
        builder = builder.with_acoustic_error_threshold(threshold);
    }
    builder
        .build()
        .map_err(|err| format!("Invalid engine configuration: {err}"))
}

fn evaluate(engine: &FeedbackEngine, args: &Args) -> Result<AlignmentReport, String> {
    match (args.response.as_deref(), args.transcript.as_deref()) {
        (Some(path), _) => {
            let response = ForcedAlignmentResponse::load(path)
                .map_err(|err| format!("Failed to load response {}: {err}", path.display()))?;
            engine
                .evaluate_response(&args.expected, &response)
                .map_err(|err| format!("Failed to evaluate response: {err}"))
        }
        (None, Some(transcript)) => engine
            .evaluate_transcript(&args.expected, transcript)
            .map_err(|err| format!("Failed to evaluate transcript: {err}")),
        (None, None) => Err("One of --response or --transcript is required.".to_string()),
    }
}

fn create_out_file(path: &Path) -> Result<fs::File, String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory {}: {err}",
                    parent.display()
                )
            })?;
        }
    }
    fs::File::create(path)
        .map_err(|err| format!("Failed to create output file {}: {err}", path.display()))
}

fn write_output(
    out: &mut dyn Write,
    report: &AlignmentReport,
    styles: &StyleTable,
    format: OutputFormat,
) -> Result<(), String> {
    match format {
        OutputFormat::Json => json_report_formatter::write_report(out, report),
        OutputFormat::Text => text_report_formatter::write_report(out, report, styles),
    }
}
