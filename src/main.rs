use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sponsorjump_lib::captions::{parse_panel_text, parse_player_response};
use sponsorjump_lib::providers::{
    CaptionUrlProvider, ChainedTranscriptProvider, InitialDataProvider, PanelTextProvider,
    StaticCurveProvider, StaticTranscriptProvider,
};
use sponsorjump_lib::utils::format_time;
use sponsorjump_lib::{
    decode_captions, fetch_transcript, AnalysisController, AnalysisOutcome, CurvePayload,
    FinalSegment, HttpCaptionFetcher, ResultConsumer, SettingsStore, TranscriptProvider,
    TranscriptUnit, VideoContext,
};

#[derive(Parser, Debug)]
#[command(
    name = "sponsorjump",
    about = "Detect sponsor segments in video transcripts"
)]
struct Cli {
    /// Optional JSON settings file overriding detection thresholds.
    #[arg(long, global = true, env = "SPONSORJUMP_SETTINGS")]
    settings: Option<PathBuf>,

    /// Print results as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a local transcript (unit JSON, json3, timed-text XML or panel text).
    Analyze(AnalyzeArgs),
    /// Fetch and decode a caption track.
    Fetch {
        #[arg(long)]
        url: String,
    },
    /// Read a player-response document, find a transcript and analyze it.
    ///
    /// Sources are tried in order: data embedded in `--page`, the
    /// transcript panel text in `--panel`, then the caption track.
    Probe {
        #[arg(long)]
        player_response: PathBuf,
        /// Saved watch-page HTML or script text.
        #[arg(long)]
        page: Option<PathBuf>,
        /// Copied transcript panel text.
        #[arg(long)]
        panel: Option<PathBuf>,
        #[command(flatten)]
        curve: CurveArgs,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[arg(long)]
    transcript: PathBuf,

    /// Video length in seconds. Defaults to the end of the last transcript unit.
    #[arg(long)]
    duration: Option<f64>,

    #[arg(long, default_value = "local")]
    video_id: String,

    #[command(flatten)]
    curve: CurveArgs,
}

#[derive(Args, Debug)]
struct CurveArgs {
    /// Engagement curve: a JSON payload or a bare path-command string.
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Coordinate-space width for a bare path string.
    #[arg(long, default_value_t = 1000.0)]
    curve_width: f64,

    /// Coordinate-space height for a bare path string.
    #[arg(long, default_value_t = 100.0)]
    curve_height: f64,
}

/// Prints one line per published segment.
struct StdoutConsumer {
    enabled: bool,
}

impl ResultConsumer for StdoutConsumer {
    fn publish(&self, video_id: &str, segments: &[FinalSegment]) {
        if !self.enabled {
            return;
        }
        println!("{}: {} sponsor segment(s)", video_id, segments.len());
        for (i, segment) in segments.iter().enumerate() {
            println!(
                "  {}/{}  {} -> {}  [{}] score={} types={}  {}",
                i + 1,
                segments.len(),
                format_time(segment.start),
                format_time(segment.end),
                segment.confidence.as_str(),
                segment.score,
                segment.signal_type_count,
                segment.keywords.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
    }

    fn clear(&self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    sponsorjump_lib::init_logging();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => SettingsStore::new(path.clone())?.settings(),
        None => Default::default(),
    };
    let consumer = Arc::new(StdoutConsumer { enabled: !cli.json });

    match cli.command {
        Command::Analyze(args) => {
            let units = load_transcript(&args.transcript)?;
            let duration = args
                .duration
                .unwrap_or_else(|| units.iter().map(TranscriptUnit::end).fold(0.0, f64::max));
            let curve = load_curve(&args.curve)?;

            let controller = AnalysisController::new(
                Arc::new(StaticTranscriptProvider::new(units)),
                Arc::new(StaticCurveProvider::new(curve)),
                consumer,
                settings,
            );
            let video = VideoContext::new(args.video_id, duration);
            report(controller.analyze(&video).await, cli.json)
        }
        Command::Fetch { url } => {
            let fetcher = HttpCaptionFetcher::default();
            let units = fetch_transcript(&fetcher, &url).await;
            if units.is_empty() {
                bail!("no caption units decoded from {}", url);
            }
            println!("{}", serde_json::to_string_pretty(&units)?);
            Ok(())
        }
        Command::Probe {
            player_response,
            page,
            panel,
            curve,
        } => {
            let contents = read(&player_response)?;
            let document: serde_json::Value =
                serde_json::from_str(&contents).with_context(|| {
                    format!("Invalid player response in {}", player_response.display())
                })?;
            let Some(video) = VideoContext::from_player_data(parse_player_response(&document))
            else {
                bail!("player response has no video id");
            };

            let mut sources: Vec<Arc<dyn TranscriptProvider>> = Vec::new();
            if let Some(path) = &page {
                sources.push(Arc::new(InitialDataProvider::new(read(path)?)));
            }
            if let Some(path) = &panel {
                sources.push(Arc::new(PanelTextProvider::new(read(path)?)));
            }
            sources.push(Arc::new(CaptionUrlProvider::new(Arc::new(
                HttpCaptionFetcher::default(),
            ))));
            let transcripts: Arc<dyn TranscriptProvider> =
                Arc::new(ChainedTranscriptProvider::new(sources));
            let controller = AnalysisController::new(
                transcripts,
                Arc::new(StaticCurveProvider::new(load_curve(&curve)?)),
                consumer,
                settings,
            );
            report(controller.analyze(&video).await, cli.json)
        }
    }
}

fn report(outcome: AnalysisOutcome, json: bool) -> Result<()> {
    match outcome {
        AnalysisOutcome::Published(segments) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&segments)?);
            } else if segments.is_empty() {
                println!("No sponsors detected");
            }
            Ok(())
        }
        AnalysisOutcome::Skipped | AnalysisOutcome::Stale => Ok(()),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_transcript(path: &Path) -> Result<Vec<TranscriptUnit>> {
    let contents = read(path)?;

    if contents.trim_start().starts_with('[') {
        let mut units: Vec<TranscriptUnit> = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid transcript units in {}", path.display()))?;
        units.sort_by(|a, b| a.start.total_cmp(&b.start));
        return Ok(units);
    }

    match decode_captions(&contents, true) {
        Ok(units) => Ok(units),
        Err(_) => {
            let units = parse_panel_text(&contents);
            if units.is_empty() {
                bail!("no transcript units found in {}", path.display());
            }
            Ok(units)
        }
    }
}

fn load_curve(args: &CurveArgs) -> Result<Option<CurvePayload>> {
    let Some(path) = &args.curve else {
        return Ok(None);
    };
    let contents = read(path)?;

    if contents.trim_start().starts_with('{') {
        let payload = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid curve payload in {}", path.display()))?;
        return Ok(Some(payload));
    }

    Ok(Some(CurvePayload {
        path: contents.trim().to_string(),
        width: args.curve_width,
        height: args.curve_height,
    }))
}
