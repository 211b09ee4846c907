//! Simulation context implementing LifeContext for deterministic testing.

use async_trait::async_trait;
use life_env::LifeContext;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Simulation context backed by a virtual clock.
///
/// The clock only moves when advanced or slept on. Simulated sleep advances
/// virtual time and then yields to the runtime so workers make progress
/// between frames.
#[derive(Clone, Default)]
pub struct SimContext {
    /// Current virtual time (nanoseconds since simulation start)
    virtual_time_ns: Arc<Mutex<u64>>,
}

impl SimContext {
    /// Creates a context with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        let mut time = self.lock_time();
        *time += duration.as_nanos() as u64;
    }

    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        *self.lock_time()
    }

    fn lock_time(&self) -> std::sync::MutexGuard<'_, u64> {
        // A poisoned counter is still a valid u64
        self.virtual_time_ns
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LifeContext for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    async fn sleep(&self, duration: Duration) {
        // Virtual time jumps; the yield lets workers run between frames
        self.advance_time(duration);
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_context_time() {
        let ctx = SimContext::new();
        assert_eq!(ctx.now(), Duration::ZERO);

        ctx.advance_time(Duration::from_secs(1));
        assert_eq!(ctx.now(), Duration::from_secs(1));

        ctx.advance_time(Duration::from_millis(500));
        assert_eq!(ctx.now(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_sim_sleep_advances_clock() {
        let ctx = SimContext::new();
        ctx.sleep(Duration::from_secs(3)).await;
        assert_eq!(ctx.now(), Duration::from_secs(3));
        assert_eq!(ctx.time_ns(), 3_000_000_000);
    }

    #[test]
    fn test_sim_context_clone_shares_time() {
        let ctx1 = SimContext::new();
        let ctx2 = ctx1.clone();

        ctx1.advance_time(Duration::from_secs(5));

        // Both should see the same time
        assert_eq!(ctx1.now(), ctx2.now());
    }
}
