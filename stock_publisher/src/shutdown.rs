//! Cooperative shutdown signal shared by the publishing loop and the aggregator.
//!
//! The signal fires when the channel delivers a message or when every sender is
//! gone. Once observed it stays set in every clone, so the loop still sees a
//! stop that the aggregator consumed mid-cycle.

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Cloneable view of the shutdown channel.
#[derive(Debug, Clone)]
pub struct Shutdown {
    signal: Receiver<()>,
    stopped: Arc<AtomicBool>,
}

impl Shutdown {
    /// Watch `signal` for a stop request.
    pub fn new(signal: Receiver<()>) -> Self {
        Self {
            signal,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A signal that never fires; waits last their full duration.
    pub fn never() -> Self {
        Self::new(crossbeam_channel::never())
    }

    /// Non-blocking check.
    pub fn requested(&self) -> bool {
        if self.stopped.load(Ordering::SeqCst) {
            return true;
        }
        match self.signal.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => self.trip(),
            Err(TryRecvError::Empty) => false,
        }
    }

    /// Sleeps up to `timeout`; returns `true` as soon as shutdown is requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.stopped.load(Ordering::SeqCst) {
            return true;
        }
        match self.signal.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => self.trip(),
            Err(RecvTimeoutError::Timeout) => false,
        }
    }

    fn trip(&self) -> bool {
        self.stopped.store(true, Ordering::SeqCst);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::time::Instant;

    #[test]
    fn stop_seen_by_one_clone_is_seen_by_all() {
        let (stop, signal) = unbounded();
        let loop_side = Shutdown::new(signal);
        let feed_side = loop_side.clone();
        assert!(!loop_side.requested());

        stop.send(()).unwrap();
        assert!(feed_side.requested());
        assert!(loop_side.requested());
        assert!(loop_side.wait(Duration::from_secs(60)));
    }

    #[test]
    fn dropped_sender_counts_as_stop() {
        let (stop, signal) = unbounded::<()>();
        let shutdown = Shutdown::new(signal);
        drop(stop);
        assert!(shutdown.requested());
    }

    #[test]
    fn wait_runs_full_timeout_without_signal() {
        let shutdown = Shutdown::never();
        let started = Instant::now();
        assert!(!shutdown.wait(Duration::from_millis(20)));
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(!shutdown.requested());
    }
}
