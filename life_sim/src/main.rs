//! Sparse Life CLI
//!
//! Runs the concurrent Game of Life until Ctrl-C (or a frame/generation
//! bound), rendering snapshots and saving frequently occurring patterns.

use clap::Parser;
use life_env::TokioContext;
use life_sim::shutdown;
use life_sim::{
    FsBucketStore, PngScatterRenderer, RunSummary, RunnerConfig, SimConfig, SimError, SimExport,
    SimWorld, SnapshotRunner, UpdateCoordinator, DEFAULT_BUCKET,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "sparse-life")]
#[command(about = "Concurrent sparse-grid Game of Life with pattern capture")]
struct Args {
    /// Master seed for the initial grid (0 = random from time)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Grid side length
    #[arg(long, default_value = "100")]
    size: u32,

    /// Initial probability that a cell is alive
    #[arg(short, long, default_value = "0.1")]
    density: f64,

    /// Number of concurrent workers
    #[arg(short, long, default_value = "16")]
    workers: usize,

    /// Milliseconds between captured frames
    #[arg(short, long, default_value = "1000")]
    interval_ms: u64,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Stop the workers at this generation
    #[arg(short, long)]
    generations: Option<u64>,

    /// Save a snapshot for every shape seen more than this many times
    #[arg(short, long, default_value = "10")]
    threshold: usize,

    /// Bucket to save patterns into
    #[arg(long, default_value = DEFAULT_BUCKET)]
    bucket: String,

    /// Directory holding buckets
    #[arg(long, default_value = "patterns")]
    store_root: PathBuf,

    /// Rendered image file
    #[arg(long, default_value = "grid.png")]
    image: PathBuf,

    /// Rendered image side in pixels
    #[arg(long, default_value = "400")]
    image_size: u32,

    /// Disable rendering
    #[arg(long)]
    no_render: bool,

    /// Export captured frames to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON summary on stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn to_config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            grid_size: self.size,
            density: self.density,
            workers: self.workers,
            frame_interval: Duration::from_millis(self.interval_ms),
            max_frames: self.frames,
            max_generations: self.generations,
            pattern_threshold: self.threshold,
            bucket: self.bucket.clone(),
            store_root: self.store_root.clone(),
            image_path: (!self.no_render).then(|| self.image.clone()),
            image_size: self.image_size,
            export_path: self.export.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("Sparse Life v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    match run(&args).await {
        Ok(summary) => print_summary(&summary, args.json),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: &Args) -> Result<RunSummary, SimError> {
    let world = SimWorld::new(args.to_config())?;
    let config = &world.config;

    let store = Arc::new(FsBucketStore::new(&config.store_root, config.bucket.clone()));
    let mut runner = SnapshotRunner::new(
        TokioContext::shared(),
        RunnerConfig::from(&world),
        world.run_id,
        store,
    );
    if let Some(path) = &config.image_path {
        runner = runner.with_renderer(Box::new(PngScatterRenderer::new(path, config.image_size)));
    }
    if config.export_path.is_some() {
        runner = runner.with_export(SimExport::new(
            &world.run_id.to_string(),
            world.seed,
            world.bounds.size(),
            config.workers,
        ));
    }

    // Show generation 0 before the workers start racing
    runner.render(&world.initial);

    let (trigger, stop) = shutdown::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping");
                trigger.trigger();
            }
            Err(e) => {
                // Keep the trigger alive so the run is not cancelled
                warn!("Ctrl-C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    });

    let coordinator = UpdateCoordinator::spawn(world.initial.clone(), world.coordinator_config())?;
    let summary = runner.run(coordinator, stop).await?;

    if let (Some(path), Some(export)) = (&config.export_path, runner.take_export()) {
        export
            .write_to_file(path)
            .map_err(|e| SimError::Export(format!("{}: {}", path, e)))?;
        info!("Exported {} frames to {}", export.frames.len(), path);
    }

    Ok(summary)
}

fn print_summary(summary: &RunSummary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to serialize summary: {}", e),
        }
        return;
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Run {}", summary.run_id);
    println!("  frames:            {}", summary.frames);
    println!("  final generation:  {}", summary.final_generation);
    println!("  live cells:        {}", summary.final_live_cells);
    println!("  patterns saved:    {}", summary.patterns_saved);
    println!("  render failures:   {}", summary.render_failures);
    println!("  store failures:    {}", summary.store_failures);
    for stats in &summary.workers {
        println!("  worker {:>2}: {} advances", stats.worker_id, stats.advances);
    }
}
