//! Concurrent update coordinator.
//!
//! A fixed pool of workers races to advance ONE shared grid. Each worker
//! takes the single lock, steps the current generation once, swaps the new
//! generation into the slot and releases. Workers do not partition the grid,
//! so the pool buys no speedup: it is a pool of advance attempts serialized
//! by the lock. What it does guarantee is a strict total order of
//! transitions - transition k+1 always reads the result of transition k.
//!
//! ```text
//!   worker 0 ──┐
//!   worker 1 ──┼──► Mutex<Arc<Generation>> ──► snapshot() ──► frame loop
//!   worker N ──┘        (one writer at a time)     (Arc clone, never torn)
//! ```
//!
//! Readers clone the `Arc` out of the slot and release the lock right away,
//! so a renderer holding generation k keeps a complete grid even after the
//! workers have moved on.

use crate::error::SimError;
use crate::shutdown::{self, Shutdown, ShutdownTrigger};

use life_core::{Generation, GridBounds};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Default number of workers.
pub const DEFAULT_WORKERS: usize = 16;

type GenerationSlot = Arc<Mutex<Arc<Generation>>>;

/// Configuration for the worker pool.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Simulated domain
    pub bounds: GridBounds,

    /// Stop once the shared generation reaches this index (None = never)
    pub advance_limit: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            bounds: GridBounds::default(),
            advance_limit: None,
        }
    }
}

/// Per-worker counters reported when the pool is joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    pub worker_id: usize,

    /// Lock acquisitions that produced a new generation
    pub advances: u64,
}

/// Outcome of a joined pool.
#[derive(Debug, Clone)]
pub struct CoordinatorReport {
    /// Stats for every worker, ordered by worker id
    pub workers: Vec<WorkerStats>,

    /// The generation left in the slot after the last worker stopped
    pub last: Arc<Generation>,
}

impl CoordinatorReport {
    /// Sum of advances over all workers.
    pub fn total_advances(&self) -> u64 {
        self.workers.iter().map(|w| w.advances).sum()
    }
}

/// Handle to a running worker pool.
pub struct UpdateCoordinator {
    slot: GenerationSlot,
    trigger: ShutdownTrigger,
    handles: Vec<JoinHandle<WorkerStats>>,
}

impl UpdateCoordinator {
    /// Spawns the workers on the current Tokio runtime.
    ///
    /// # Errors
    /// `SimError::NoWorkers` if `config.workers` is 0.
    pub fn spawn(initial: Generation, config: CoordinatorConfig) -> Result<Self, SimError> {
        if config.workers == 0 {
            return Err(SimError::NoWorkers);
        }

        let start_index = initial.index;
        let slot: GenerationSlot = Arc::new(Mutex::new(Arc::new(initial)));
        let (trigger, shutdown) = shutdown::channel();

        let handles = (0..config.workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    slot: Arc::clone(&slot),
                    bounds: config.bounds,
                    limit: config.advance_limit,
                    shutdown: shutdown.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        info!(
            "Update coordinator started: {} workers, {}x{} domain, from generation {}",
            config.workers,
            config.bounds.size(),
            config.bounds.size(),
            start_index
        );

        Ok(Self {
            slot,
            trigger,
            handles,
        })
    }

    /// Captures the current generation.
    ///
    /// The lock is held only for the `Arc` clone; the returned snapshot is
    /// immutable and stays valid after the workers replace it.
    pub async fn snapshot(&self) -> Arc<Generation> {
        Arc::clone(&*self.slot.lock().await)
    }

    /// Signals every worker to stop. Workers notice while waiting for the
    /// lock or right after their current advance.
    pub fn shutdown(&self) {
        self.trigger.trigger();
    }

    /// True once every worker has returned.
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(|h| h.is_finished())
    }

    /// Waits for all workers to return.
    ///
    /// Unbounded pools only return after [`shutdown`](Self::shutdown).
    pub async fn join(self) -> Result<CoordinatorReport, SimError> {
        let mut workers = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            let stats = handle.await.map_err(|e| SimError::Join(e.to_string()))?;
            debug!("  worker {} stopped after {} advances", stats.worker_id, stats.advances);
            workers.push(stats);
        }

        let last = Arc::clone(&*self.slot.lock().await);
        info!(
            "Update coordinator stopped at generation {} ({} live cells)",
            last.index,
            last.live_count()
        );

        Ok(CoordinatorReport { workers, last })
    }

    /// Signals shutdown and waits for the workers.
    pub async fn stop(self) -> Result<CoordinatorReport, SimError> {
        self.shutdown();
        self.join().await
    }
}

/// Runs `workers` concurrent workers for exactly `advances` lock-guarded
/// transitions starting from `initial`, then returns the report.
pub async fn run_bounded(
    initial: Generation,
    bounds: GridBounds,
    workers: usize,
    advances: u64,
) -> Result<CoordinatorReport, SimError> {
    let limit = initial.index + advances;
    let coordinator = UpdateCoordinator::spawn(
        initial,
        CoordinatorConfig {
            workers,
            bounds,
            advance_limit: Some(limit),
        },
    )?;
    coordinator.join().await
}

/// One member of the pool.
struct Worker {
    id: usize,
    slot: GenerationSlot,
    bounds: GridBounds,
    limit: Option<u64>,
    shutdown: Shutdown,
}

impl Worker {
    async fn run(mut self) -> WorkerStats {
        let mut advances = 0;
        debug!("  worker {} started", self.id);

        loop {
            if self.shutdown.is_triggered() {
                break;
            }

            // Suspend on the lock, but give up the wait if shutdown fires
            let mut current = tokio::select! {
                biased;
                _ = self.shutdown.triggered() => break,
                guard = self.slot.lock() => guard,
            };

            if self.limit.is_some_and(|limit| current.index >= limit) {
                break;
            }

            let next = current.next(&self.bounds);
            *current = Arc::new(next);
            drop(current);
            advances += 1;

            tokio::task::yield_now().await;
        }

        WorkerStats {
            worker_id: self.id,
            advances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::SparseGrid;
    use std::time::Duration;

    fn blinker() -> Generation {
        Generation::initial(SparseGrid::from_cells([(4, 5), (5, 5), (6, 5)]))
    }

    fn bounds() -> GridBounds {
        GridBounds::new(12).unwrap()
    }

    #[tokio::test]
    async fn test_zero_workers_rejected() {
        let config = CoordinatorConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            UpdateCoordinator::spawn(blinker(), config),
            Err(SimError::NoWorkers)
        ));
    }

    #[tokio::test]
    async fn test_bounded_run_stops_at_limit() {
        let report = run_bounded(blinker(), bounds(), 4, 10).await.unwrap();

        assert_eq!(report.last.index, 10);
        assert_eq!(report.total_advances(), 10);
        assert_eq!(report.workers.len(), 4);
        // Even number of steps: back to horizontal
        assert_eq!(report.last.grid, blinker().grid);
    }

    #[tokio::test]
    async fn test_bounded_run_continues_from_index() {
        let start = Generation {
            index: 7,
            grid: blinker().grid,
        };
        let report = run_bounded(start, bounds(), 2, 3).await.unwrap();
        assert_eq!(report.last.index, 10);
        assert_eq!(report.total_advances(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shutdown_stops_unbounded_pool() {
        let coordinator = UpdateCoordinator::spawn(
            blinker(),
            CoordinatorConfig {
                workers: 8,
                bounds: bounds(),
                advance_limit: None,
            },
        )
        .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        let mid = coordinator.snapshot().await;

        let report = tokio::time::timeout(Duration::from_secs(5), coordinator.stop())
            .await
            .expect("workers should observe shutdown")
            .unwrap();

        assert!(report.last.index >= mid.index);
        assert_eq!(report.total_advances(), report.last.index);
    }

    #[tokio::test]
    async fn test_snapshot_survives_replacement() {
        let coordinator = UpdateCoordinator::spawn(
            blinker(),
            CoordinatorConfig {
                workers: 2,
                bounds: bounds(),
                advance_limit: Some(50),
            },
        )
        .unwrap();

        let early = coordinator.snapshot().await;
        let report = coordinator.join().await.unwrap();

        // The captured snapshot is a complete blinker phase, whatever happened later
        assert_eq!(early.live_count(), 3);
        assert_eq!(report.last.index, 50);
    }
}
