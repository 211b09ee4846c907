//! Cooperative shutdown signal shared by workers and the frame loop.

use tokio::sync::watch;

/// Sending half. Triggering is idempotent.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Receiving half, cloned into every task that must stop.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// Creates a connected trigger/signal pair.
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl ShutdownTrigger {
    /// Asks every holder of the paired `Shutdown` to stop.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Another receiver for the same signal.
    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }
}

impl Shutdown {
    /// Non-blocking check.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal fires, or once every trigger is dropped.
    ///
    /// Cancel-safe: dropping the future loses nothing.
    pub async fn triggered(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_waiter() {
        let (trigger, mut shutdown) = channel();
        assert!(!shutdown.is_triggered());

        let waiter = tokio::spawn(async move {
            shutdown.triggered().await;
            shutdown.is_triggered()
        });

        tokio::time::sleep(Duration::from_millis(5)).await;
        trigger.trigger();

        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_already_triggered_returns_immediately() {
        let (trigger, _) = channel();
        trigger.trigger();

        let mut late = trigger.subscribe();
        late.triggered().await;
        assert!(late.is_triggered());
    }

    #[tokio::test]
    async fn test_dropped_trigger_releases_waiters() {
        let (trigger, mut shutdown) = channel();
        drop(trigger);
        shutdown.triggered().await;
        assert!(!shutdown.is_triggered());
    }
}
