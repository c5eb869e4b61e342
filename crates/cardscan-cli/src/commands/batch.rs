//! Batch command - replay every transcript matching a pattern.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use cardscan_core::models::config::OutputFormat;

use super::load_config;
use super::scan::{format_csv, format_report, scan_file, OutputFormatArg, ScanReport};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of transcripts (.json or .txt)
    #[arg(required = true)]
    pattern: String,

    /// Write one report per transcript into this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Format of the per-transcript reports
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormatArg,

    /// Write summary.csv with one row per transcript
    #[arg(long)]
    summary: bool,

    /// Keep going when a transcript cannot be read
    #[arg(long)]
    continue_on_error: bool,

    /// Print full card numbers
    #[arg(long)]
    reveal: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let started = Instant::now();
    let config = load_config(config_path)?;
    let mask = config.output.mask_card_number && !args.reveal;

    let transcripts = collect_transcripts(&args.pattern)?;
    println!(
        "{} Found {} transcripts to replay",
        style("ℹ").blue(),
        transcripts.len()
    );

    let pb = ProgressBar::new(transcripts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} transcripts")?
            .progress_chars("=>-"),
    );

    let mut reports: Vec<ScanReport> = Vec::with_capacity(transcripts.len());
    let mut failures: Vec<(PathBuf, String)> = Vec::new();

    for path in transcripts {
        match scan_file(&path, &config.scan).await {
            Ok(report) if mask => reports.push(report.masked()),
            Ok(report) => reports.push(report),
            Err(e) if args.continue_on_error => {
                warn!("Skipping {}: {}", path.display(), e);
                failures.push((path, e.to_string()));
            }
            Err(e) => {
                error!("Failed to replay {}: {}", path.display(), e);
                pb.abandon();
                return Err(e.context(format!("replaying {}", path.display())));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
        let format = OutputFormat::from(args.format);
        for report in &reports {
            write_report(dir, report, format)?;
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join("summary.csv");
        fs::write(&summary_path, format_csv(&reports)?)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let recognized = reports.iter().filter(|r| r.recognized).count();
    println!();
    println!(
        "{} Replayed {} transcripts in {:?}",
        style("✓").green(),
        reports.len() + failures.len(),
        started.elapsed()
    );
    println!(
        "  {} recognized, {} without a card, {} failed",
        style(recognized).green(),
        style(reports.len() - recognized).yellow(),
        style(failures.len()).red()
    );
    for (path, reason) in &failures {
        println!("  {} {}: {}", style("✗").red(), path.display(), reason);
    }

    Ok(())
}

/// Transcript files matching a glob pattern, sorted.
fn collect_transcripts(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| is_transcript(path))
        .collect();
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("No transcripts match {}", pattern);
    }
    Ok(paths)
}

fn is_transcript(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("txt"))
}

fn write_report(dir: &Path, report: &ScanReport, format: OutputFormat) -> anyhow::Result<()> {
    let stem = Path::new(&report.source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scan");
    let extension = match format {
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
        OutputFormat::Text => "txt",
    };

    let path = dir.join(format!("{}.{}", stem, extension));
    fs::write(&path, format_report(report, format)?)?;
    debug!("Wrote report to {}", path.display());
    Ok(())
}
