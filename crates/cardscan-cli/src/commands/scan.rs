//! Scan command - replay a recorded transcript through a scan session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use cardscan_core::models::config::{OutputFormat, ScanConfig};
use cardscan_core::{
    mask_card_number, readable_expiry_date, CaptureSession, MainQueue, ScanSession, ScannedCard,
    SessionError, Transcript,
};

use super::load_config;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Transcript file (.json array of frames, or .txt with blank-line separated frames)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormatArg>,

    /// Print the full card number
    #[arg(long)]
    reveal: bool,

    /// Maximum frames to replay (overrides config)
    #[arg(long)]
    max_frames: Option<usize>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormatArg {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(format: OutputFormatArg) -> Self {
        match format {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Text => OutputFormat::Text,
        }
    }
}

/// Outcome of replaying one transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub source: String,
    pub recognized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    pub frames: u64,
    pub total_frames: usize,
    pub processing_time_ms: u64,
}

impl ScanReport {
    /// Hide all but the last four card digits.
    pub fn masked(mut self) -> Self {
        self.card_number = self.card_number.map(|n| mask_card_number(&n));
        self
    }
}

/// Camera stand-in: frames come from the transcript while it runs.
struct ReplayCamera {
    running: Arc<AtomicBool>,
}

impl CaptureSession for ReplayCamera {
    fn start(&mut self) -> Result<(), SessionError> {
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(max_frames) = args.max_frames {
        config.scan.max_frames = max_frames;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Replaying transcript: {}", args.input.display());
    let transcript = Transcript::from_file(&args.input)?;

    let pb = ProgressBar::new(transcript.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames")?
            .progress_chars("##-"),
    );

    let mut report = scan_transcript(&transcript, &config.scan, Some(&pb)).await?;
    report.source = args.input.display().to_string();
    pb.finish_and_clear();

    if config.output.mask_card_number && !args.reveal {
        report = report.masked();
    }

    let format = args.format.map(OutputFormat::from).unwrap_or(config.output.format);
    let output = format_report(&report, format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if !report.recognized {
        eprintln!(
            "{} No card recognized in {} frames",
            style("!").yellow(),
            report.frames
        );
    }

    Ok(())
}

/// Replay a transcript through a fresh scan session.
///
/// A producer task plays the camera, posting each frame onto the main queue;
/// this task drives the queue until the session ends or the frames run out.
pub async fn scan_transcript(
    transcript: &Transcript,
    config: &ScanConfig,
    pb: Option<&ProgressBar>,
) -> anyhow::Result<ScanReport> {
    let start = Instant::now();
    let mut queue = MainQueue::new();
    let running = Arc::new(AtomicBool::new(false));
    let scanned: Arc<Mutex<Option<ScannedCard>>> = Arc::new(Mutex::new(None));

    let sink = scanned.clone();
    let delegate = Arc::new(move |card: &ScannedCard| {
        if let Ok(mut slot) = sink.lock() {
            *slot = Some(card.clone());
        }
    });

    let camera = ReplayCamera {
        running: running.clone(),
    };
    let session = Arc::new(ScanSession::new(queue.handle(), Box::new(camera), delegate));
    session.start()?;

    let limit = match config.max_frames {
        0 => transcript.len(),
        n => n.min(transcript.len()),
    };
    let frames: Vec<Vec<String>> = transcript.frames.iter().take(limit).cloned().collect();
    let interval = Duration::from_millis(config.frame_interval_ms);
    let exhausted = Arc::new(AtomicBool::new(false));

    let producer = {
        let handle = queue.handle();
        let session = session.clone();
        let running = running.clone();
        let exhausted = exhausted.clone();
        let pb = pb.cloned();
        tokio::spawn(async move {
            for lines in frames {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                if session.post_recognition(&handle, Ok(lines)).is_err() {
                    break;
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                if interval.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(interval).await;
                }
            }
            let _ = handle.dispatch(move || exhausted.store(true, Ordering::SeqCst));
        })
    };

    while !session.is_finished() && !exhausted.load(Ordering::SeqCst) {
        if !queue.run_next().await {
            break;
        }
    }
    // Deliver notifications queued behind the last frame.
    queue.run_pending();
    producer.await?;

    if !session.is_finished() {
        session.dismiss();
    }

    let card = scanned.lock().ok().and_then(|slot| slot.clone());
    debug!(
        "Session ended after {} frames: {:?}",
        session.frames_seen(),
        session.status()
    );

    Ok(ScanReport {
        source: String::new(),
        recognized: card.is_some(),
        card_number: card.as_ref().map(|c| c.card_number.clone()),
        expiry_date: card.map(|c| c.expiry_date),
        frames: session.frames_seen(),
        total_frames: transcript.len(),
        processing_time_ms: elapsed_ms(start.elapsed()),
    })
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Replay a transcript file, for the batch command.
pub async fn scan_file(path: &Path, config: &ScanConfig) -> anyhow::Result<ScanReport> {
    let transcript = Transcript::from_file(path)?;
    let mut report = scan_transcript(&transcript, config, None).await?;
    report.source = path.display().to_string();
    Ok(report)
}

pub fn format_report(report: &ScanReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(std::slice::from_ref(report)),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

pub fn format_csv(reports: &[ScanReport]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "source",
        "recognized",
        "card_number",
        "expiry_date",
        "frames",
        "total_frames",
    ])?;

    for report in reports {
        let frames = report.frames.to_string();
        let total_frames = report.total_frames.to_string();
        wtr.write_record([
            report.source.as_str(),
            if report.recognized { "true" } else { "false" },
            report.card_number.as_deref().unwrap_or_default(),
            report.expiry_date.as_deref().unwrap_or_default(),
            frames.as_str(),
            total_frames.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Source: {}\n", report.source));
    match (&report.card_number, &report.expiry_date) {
        (Some(number), Some(expiry)) if report.recognized => {
            output.push_str(&format!("Card number: {}\n", number));
            output.push_str(&format!("Expiry date: {}\n", readable_expiry_date(expiry)));
        }
        _ => output.push_str("No card recognized\n"),
    }
    output.push_str(&format!(
        "Frames: {}/{}\n",
        report.frames, report.total_frames
    ));

    output
}
