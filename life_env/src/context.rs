//! Core environment context trait for the snapshot loop.

use async_trait::async_trait;
use std::time::Duration;

/// The central interface for time.
///
/// This trait abstracts the clock so that the snapshot loop can run
/// against real time in production and a virtual clock in tests.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`
/// - **Simulation**: `SimContext` - manually advanced virtual clock
///
/// # Determinism
///
/// The simulation context never reads the wall clock, so a frame cadence
/// driven through it is reproducible.
#[async_trait]
pub trait LifeContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances the virtual clock and yields
    async fn sleep(&self, duration: Duration);
}
