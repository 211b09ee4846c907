//! Sparse Life Simulation Harness
//!
//! This crate runs the pure `life_core` engine concurrently and connects it
//! to the outside world through the `life_env` seams.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SimWorld                            │
//! │        (SimConfig + seeded generation 0 + RunId)            │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │
//!  ┌─────────────────────────▼──────────────────────────┐
//!  │ UpdateCoordinator                                   │
//!  │   worker 0..N ──► Mutex<Arc<Generation>>            │
//!  └─────────────────────────┬──────────────────────────┘
//!                            │ snapshot() every frame_interval
//!  ┌─────────────────────────▼──────────────────────────┐
//!  │ SnapshotRunner                                      │
//!  │   FrameRenderer ─ Census ─ PatternStore ─ SimExport │
//!  └────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use life_sim::{SimConfig, SimWorld, UpdateCoordinator};
//!
//! let world = SimWorld::new(SimConfig {
//!     seed: 42,
//!     workers: 4,
//!     ..Default::default()
//! })?;
//!
//! let coordinator = UpdateCoordinator::spawn(world.initial.clone(), world.coordinator_config())?;
//! let snapshot = coordinator.snapshot().await;
//! ```

mod context;
mod coordinator;
mod error;
mod exporter;
mod runner;
pub mod shutdown;
mod storage;
mod visualizer;
mod world;

pub use context::SimContext;
pub use coordinator::{
    run_bounded, CoordinatorConfig, CoordinatorReport, UpdateCoordinator, WorkerStats,
    DEFAULT_WORKERS,
};
pub use error::SimError;
pub use exporter::{FrameRecord, PatternCount, SimExport};
pub use runner::{FrameOutcome, RunSummary, RunnerConfig, SnapshotRunner};
pub use shutdown::Shutdown;
pub use storage::{encode_npy, FsBucketStore, MemoryPatternStore, DEFAULT_BUCKET};
pub use visualizer::{PngScatterRenderer, DEFAULT_IMAGE_PATH, DEFAULT_IMAGE_SIZE};
pub use world::{resolve_seed, SimConfig, SimWorld, DEFAULT_PATTERN_THRESHOLD};
