//! Snapshot runner - the fixed-cadence frame loop.
//!
//! The runner never waits for worker progress. Every `frame_interval` it
//! captures whatever generation is current, renders it, runs the census and
//! saves the snapshot under every shape that occurs often enough. Render and
//! storage failures are logged and counted; they never stop the run.

use crate::coordinator::{UpdateCoordinator, WorkerStats};
use crate::error::SimError;
use crate::exporter::{FrameRecord, SimExport};
use crate::shutdown::Shutdown;
use crate::world::{SimWorld, DEFAULT_PATTERN_THRESHOLD};

use life_core::{Census, Generation, GridBounds};
use life_env::{EnvError, FrameRenderer, LifeContext, Occupancy, PatternStore, RunId, ScatterFrame};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Frame loop settings.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Time between frames
    pub frame_interval: Duration,

    /// Stop after this many frames (None = until shutdown)
    pub max_frames: Option<u64>,

    /// Shapes must occur more than this many times to be saved
    pub pattern_threshold: usize,

    /// Upper bound on a single `put_pattern` call
    pub store_timeout: Duration,

    /// Simulated domain
    pub bounds: GridBounds,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_secs(1),
            max_frames: None,
            pattern_threshold: DEFAULT_PATTERN_THRESHOLD,
            store_timeout: Duration::from_secs(10),
            bounds: GridBounds::default(),
        }
    }
}

impl From<&SimWorld> for RunnerConfig {
    fn from(world: &SimWorld) -> Self {
        Self {
            frame_interval: world.config.frame_interval,
            max_frames: world.config.max_frames,
            pattern_threshold: world.config.pattern_threshold,
            store_timeout: world.config.store_timeout,
            bounds: world.bounds,
        }
    }
}

/// What happened to one captured frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Generation index of the snapshot
    pub generation: u64,

    /// Whether the image was written
    pub rendered: bool,

    /// Object keys written for this frame
    pub saved: Vec<String>,
}

/// End-of-run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub frames: u64,
    pub final_generation: u64,
    pub final_live_cells: usize,
    pub patterns_saved: u64,
    pub render_failures: u64,
    pub store_failures: u64,
    pub workers: Vec<WorkerStats>,
}

impl RunSummary {
    /// Sum of advances over all workers.
    pub fn total_advances(&self) -> u64 {
        self.workers.iter().map(|w| w.advances).sum()
    }
}

/// Drives the frame loop against a running coordinator.
pub struct SnapshotRunner<Ctx: LifeContext> {
    context: Arc<Ctx>,
    config: RunnerConfig,
    run_id: RunId,
    store: Arc<dyn PatternStore>,
    renderer: Option<Box<dyn FrameRenderer>>,
    export: Option<SimExport>,
    bucket_ready: bool,
    started: Duration,

    frames: u64,
    patterns_saved: u64,
    render_failures: u64,
    store_failures: u64,
}

impl<Ctx: LifeContext> SnapshotRunner<Ctx> {
    /// Creates a runner with rendering and export disabled.
    pub fn new(
        context: Arc<Ctx>,
        config: RunnerConfig,
        run_id: RunId,
        store: Arc<dyn PatternStore>,
    ) -> Self {
        let started = context.now();
        Self {
            context,
            config,
            run_id,
            store,
            renderer: None,
            export: None,
            bucket_ready: false,
            started,
            frames: 0,
            patterns_saved: 0,
            render_failures: 0,
            store_failures: 0,
        }
    }

    /// Enables rendering.
    pub fn with_renderer(mut self, renderer: Box<dyn FrameRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Enables frame export.
    pub fn with_export(mut self, export: SimExport) -> Self {
        self.export = Some(export);
        self
    }

    /// The export collected so far.
    pub fn export(&self) -> Option<&SimExport> {
        self.export.as_ref()
    }

    /// Takes the export out of the runner.
    pub fn take_export(&mut self) -> Option<SimExport> {
        self.export.take()
    }

    /// Tries to create the bucket. Failure is logged and retried later.
    pub async fn connect_store(&mut self) -> bool {
        match self.store.ensure_bucket().await {
            Ok(()) => {
                if !self.bucket_ready {
                    info!("Bucket {} ready", self.store.bucket());
                }
                self.bucket_ready = true;
            }
            Err(e) => {
                warn!("Bucket {} unavailable: {}", self.store.bucket(), e);
                self.bucket_ready = false;
            }
        }
        self.bucket_ready
    }

    /// Runs frames until `stop` fires, `max_frames` is reached, or a bounded
    /// pool finishes. Then stops the pool and summarizes.
    pub async fn run(
        &mut self,
        coordinator: UpdateCoordinator,
        mut stop: Shutdown,
    ) -> Result<RunSummary, SimError> {
        self.connect_store().await;
        info!(
            "Frame loop started: every {:?}, saving shapes seen more than {} times",
            self.config.frame_interval, self.config.pattern_threshold
        );

        let mut last_captured = None;
        let mut pool_finished = false;
        loop {
            if stop.is_triggered() {
                info!("Shutdown requested");
                break;
            }
            if self.frame_limit_reached() {
                info!("Reached {} frames", self.frames);
                break;
            }

            let snapshot = coordinator.snapshot().await;
            let outcome = self.capture(&snapshot).await;
            last_captured = Some(outcome.generation);

            if self.frame_limit_reached() {
                info!("Reached {} frames", self.frames);
                break;
            }
            if coordinator.is_finished() {
                info!("Workers finished");
                pool_finished = true;
                break;
            }

            tokio::select! {
                _ = self.context.sleep(self.config.frame_interval) => {}
                _ = stop.triggered() => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        let report = coordinator.stop().await?;

        // The pool may have advanced between the last capture and finishing
        if pool_finished && last_captured != Some(report.last.index) {
            self.capture(&report.last).await;
        }

        if let Some(export) = &mut self.export {
            export.finalize(report.last.index);
        }

        let summary = RunSummary {
            run_id: self.run_id.to_string(),
            frames: self.frames,
            final_generation: report.last.index,
            final_live_cells: report.last.live_count(),
            patterns_saved: self.patterns_saved,
            render_failures: self.render_failures,
            store_failures: self.store_failures,
            workers: report.workers,
        };

        info!(
            "Run {} finished: {} frames, generation {}, {} patterns saved ({} render / {} store failures)",
            summary.run_id,
            summary.frames,
            summary.final_generation,
            summary.patterns_saved,
            summary.render_failures,
            summary.store_failures
        );

        Ok(summary)
    }

    fn frame_limit_reached(&self) -> bool {
        self.config.max_frames.is_some_and(|max| self.frames >= max)
    }

    /// Processes one snapshot: render, census, persist, export.
    pub async fn capture(&mut self, snapshot: &Generation) -> FrameOutcome {
        let frame = self.frames;
        let census = Census::of(&snapshot.grid);

        info!(
            "Frame {} | generation {} | {} live cells | {} clusters, {} distinct shapes",
            frame,
            snapshot.index,
            snapshot.live_count(),
            census.cluster_count(),
            census.distinct_shapes()
        );

        let rendered = self.render(snapshot);
        let saved = self.persist(snapshot, &census).await;

        if let Some(export) = &mut self.export {
            let elapsed = self.context.now().saturating_sub(self.started);
            export.add_frame(FrameRecord::capture(
                frame,
                elapsed.as_secs_f64(),
                snapshot,
                &census,
            ));
        }

        self.frames += 1;
        FrameOutcome {
            generation: snapshot.index,
            rendered,
            saved,
        }
    }

    /// Draws a snapshot. Returns false if rendering is off or failed.
    pub fn render(&mut self, snapshot: &Generation) -> bool {
        let Some(renderer) = &self.renderer else {
            return false;
        };

        let points = snapshot
            .grid
            .sorted_cells()
            .into_iter()
            .map(Into::into)
            .collect();
        let frame = ScatterFrame::new(snapshot.index, self.config.bounds.size(), points);

        match renderer.render(&frame) {
            Ok(()) => {
                debug!("Rendered generation {} to {}", snapshot.index, renderer.target());
                true
            }
            Err(e) => {
                self.render_failures += 1;
                warn!("Skipping render of generation {}: {}", snapshot.index, e);
                false
            }
        }
    }

    async fn persist(&mut self, snapshot: &Generation, census: &Census) -> Vec<String> {
        let frequent = census.frequent(self.config.pattern_threshold);
        if frequent.is_empty() {
            return Vec::new();
        }

        if !self.bucket_ready && !self.connect_store().await {
            self.store_failures += 1;
            warn!(
                "Skipping {} pattern save(s) for generation {}",
                frequent.len(),
                snapshot.index
            );
            return Vec::new();
        }

        let occupancy = snapshot.grid.to_occupancy(&self.config.bounds);
        let mut saved = Vec::with_capacity(frequent.len());

        for (shape, count) in frequent {
            let label = format!("{}/pattern_{}", self.run_id, shape.label());
            match self.put_pattern(&label, &occupancy).await {
                Ok(key) => {
                    info!(
                        "Saved {} ({} occurrences) as {}/{}",
                        shape.label(),
                        count,
                        self.store.bucket(),
                        key
                    );
                    saved.push(key);
                }
                Err(e) => {
                    self.store_failures += 1;
                    warn!("Failed to save {}: {}", label, e);
                    if matches!(e, EnvError::StorageUnavailable(_) | EnvError::Timeout(_)) {
                        self.bucket_ready = false;
                        break;
                    }
                }
            }
        }

        self.patterns_saved += saved.len() as u64;
        saved
    }

    async fn put_pattern(&self, label: &str, occupancy: &Occupancy) -> Result<String, EnvError> {
        let timeout = self.config.store_timeout;
        tokio::time::timeout(timeout, self.store.put_pattern(label, occupancy))
            .await
            .map_err(|_| EnvError::Timeout(timeout.as_millis() as u64))?
    }
}
