//! Replay CLI Tool
//!
//! Command-line interface for reconstructing, exporting and rendering agent
//! telemetry replays.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use replay_core::{FrameBuilder, ReplayConfig, TimelineCollection};
use replay_logs::{LoadReport, LoadedLogs};
use replay_render::{FrameRenderer, RenderConfig, Viewport};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "replay")]
#[command(about = "Telemetry replay - reconstruct who was where, doing what, and relaying to whom")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReplayArgs {
    /// Directory holding one `<agent>.json` log per agent
    log_dir: PathBuf,

    /// Interval between frames in milliseconds
    #[arg(long, default_value = "10000")]
    step_ms: i64,

    /// Relay detection window in milliseconds
    #[arg(long, default_value = "30000")]
    relay_window_ms: i64,
}

impl ReplayArgs {
    fn config(&self) -> ReplayConfig {
        ReplayConfig {
            step_ms: self.step_ms,
            relay_window_ms: self.relay_window_ms,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the frame sequence and export it as JSON
    Frames {
        #[command(flatten)]
        replay: ReplayArgs,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the frame sequence to PNG images
    Render {
        #[command(flatten)]
        replay: ReplayArgs,

        /// Output directory for frame images
        #[arg(short, long)]
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value = "1100")]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value = "700")]
        height: u32,

        /// Omit the timestamp title
        #[arg(long)]
        no_title: bool,
    },

    /// Show agents, time range and spatial extent of a log directory
    Info {
        #[command(flatten)]
        replay: ReplayArgs,
    },

    /// Combine per-day `logs*.json` files into one file per agent
    Combine {
        /// Parent directory with one subdirectory per agent
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for the combined `<agent>.json` files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Frames { replay, output } => export_frames(&replay, output)?,
        Commands::Render {
            replay,
            output,
            width,
            height,
            no_title,
        } => render_frames(&replay, output, width, height, no_title)?,
        Commands::Info { replay } => show_info(&replay)?,
        Commands::Combine { input, output_dir } => combine(input, output_dir)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(log_dir: &Path) -> Result<LoadedLogs> {
    let loaded = replay_logs::load_collection(log_dir)
        .with_context(|| format!("Failed to load agent logs from {}", log_dir.display()))?;
    tracing::debug!(agents = loaded.collection.len(), "log directory loaded");
    warn_skipped(&loaded.report);
    Ok(loaded)
}

fn warn_skipped(report: &LoadReport) {
    for (path, reason) in &report.skipped {
        eprintln!("Warning: skipped {} - {}", path.display(), reason);
    }
    let rejected = report.total_rejected();
    if rejected > 0 {
        eprintln!("Warning: dropped {} malformed records", rejected);
    }
}

fn export_frames(replay: &ReplayArgs, output: Option<PathBuf>) -> Result<()> {
    let loaded = load(&replay.log_dir)?;
    let builder =
        FrameBuilder::new(&loaded.collection, replay.config()).context("Failed to set up frame builder")?;

    let frames = builder.build_all();

    match output {
        Some(path) => {
            let file = File::create(&path).context("Failed to create output file")?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &frames).context("Failed to write frames")?;
            writer.flush()?;
            eprintln!("Wrote {} frames to {}", frames.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, &frames).context("Failed to write frames")?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn render_frames(replay: &ReplayArgs, output: PathBuf, width: u32, height: u32, no_title: bool) -> Result<()> {
    let loaded = load(&replay.log_dir)?;
    let collection = &loaded.collection;
    let builder = FrameBuilder::new(collection, replay.config()).context("Failed to set up frame builder")?;

    let mut config = RenderConfig {
        width,
        height,
        ..Default::default()
    };
    if no_title {
        config.title_scale = 0;
    }
    let bounds = collection.spatial_bounds()?;
    let viewport = Viewport::from_bounds(&bounds, config.width, config.height, config.padding_ratio);
    let renderer = FrameRenderer::new(config, viewport);

    println!("Building {} frames...", builder.frame_count());
    let frames = builder.build_all();

    println!("Rendering to {}", output.display());
    let written = replay_render::render_sequence(&frames, &output, &renderer)
        .context("Failed to render frames")?;

    println!("Successfully rendered {} frames", written);
    Ok(())
}

fn show_info(replay: &ReplayArgs) -> Result<()> {
    let loaded = load(&replay.log_dir)?;
    print_info(&loaded.collection, &loaded.report, replay.config())
}

fn print_info(collection: &TimelineCollection, report: &LoadReport, config: ReplayConfig) -> Result<()> {
    println!("\n=== Replay Information ===");
    println!("Agents: {}", collection.len());

    let (start, end) = collection.time_range()?;
    println!("Start: {} ({} ms)", format_time(start), start);
    println!("End:   {} ({} ms)", format_time(end), end);
    println!("Duration: {:.2} seconds", end.abs_diff(start) as f64 / 1000.0);

    let bounds = collection.spatial_bounds()?;
    println!(
        "Latitude:  {:.6} .. {:.6}",
        bounds.min_latitude, bounds.max_latitude
    );
    println!(
        "Longitude: {:.6} .. {:.6}",
        bounds.min_longitude, bounds.max_longitude
    );

    let builder = FrameBuilder::new(collection, config)?;
    println!(
        "Frames: {} (every {} ms, relay window {} ms)",
        builder.frame_count(),
        config.step_ms,
        config.relay_window_ms
    );

    println!("\n=== Agents ===");
    for agent in &report.agents {
        println!(
            "  {}: {} positions, {} events, {} rejected",
            agent.name, agent.positions, agent.events, agent.rejected
        );
    }
    if !report.skipped.is_empty() {
        println!("  ... {} files skipped", report.skipped.len());
    }

    Ok(())
}

fn format_time(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "out of range".to_string())
}

fn combine(input: PathBuf, output_dir: PathBuf) -> Result<()> {
    let summaries = replay_logs::combine_subdirectories(&input, &output_dir)
        .with_context(|| format!("Failed to combine logs under {}", input.display()))?;

    for summary in &summaries {
        println!(
            "Combined {} into {} ({} records)",
            summary.input_dir.display(),
            summary.output_file.display(),
            summary.records
        );
    }
    println!("Successfully combined {} agent directories", summaries.len());
    Ok(())
}
