//! Stop signal for background loops.
//!
//! A latch, not an event: once triggered it stays triggered, so a loop
//! that subscribes late (or is between awaits when the trigger fires)
//! still observes it on its next `wait`.

use tokio::sync::watch;

/// Owner side of the stop latch.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// Loop side of the stop latch.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Fire the latch. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once the latch has fired, or the owner is gone.
    pub async fn wait(&mut self) {
        // Err means the sender was dropped; treat that as a stop too.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }
}
