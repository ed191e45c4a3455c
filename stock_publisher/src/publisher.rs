//! Fixed-interval publishing loop.
//!
//! ```text
//! CONNECTING -> CONNECTED -> { FETCHING -> PUBLISHING -> WAITING } -> DISCONNECTING -> STOPPED
//! ```
//!
//! A failed connect ends `run` with the error. Once connected, nothing inside
//! a cycle can stop the loop: fetch failures become an empty batch, publish
//! failures are logged. Shutdown is cooperative; the signal is checked after
//! fetching and during the wait, and the feed checks the same signal between
//! its own blocking calls so an interrupt cuts a running cycle short.
//! Disconnect is tied to a guard, so it runs exactly once on every exit path,
//! unwinding included.

use log::{debug, error, info, warn};
use std::time::Duration;
use strum_macros::Display;

use stock_common::Result;
use stock_common::model::StockBatch;

use crate::shutdown::Shutdown;
use crate::sink::{QoS, TelemetrySink};

/// Supplier of one batch per cycle.
pub trait StockFeed {
    /// Collect the batch for the current cycle.
    fn collect(&mut self) -> Result<StockBatch>;
}

/// Publisher lifecycle, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LoopState {
    Connecting,
    Connected,
    Fetching,
    Publishing,
    Waiting,
    Disconnecting,
    Stopped,
}

/// Publishes a batch from `feed` to `sink` every `interval` until shut down.
pub struct Publisher<S, F> {
    sink: S,
    feed: F,
    topic: String,
    interval: Duration,
    shutdown: Shutdown,
}

impl<S: TelemetrySink, F: StockFeed> Publisher<S, F> {
    /// `shutdown` stops the loop once requested.
    pub fn new(sink: S, feed: F, topic: String, interval: Duration, shutdown: Shutdown) -> Self {
        Self {
            sink,
            feed,
            topic,
            interval,
            shutdown,
        }
    }

    /// Run until shutdown. Returns `Err` only when the initial connect fails.
    pub fn run(&mut self) -> Result<()> {
        transition(LoopState::Connecting);
        if let Err(e) = self.sink.connect() {
            error!("Connection failed: {}", e);
            return Err(e);
        }
        transition(LoopState::Connected);

        let mut connection = Connection {
            sink: &mut self.sink,
        };
        let mut cycle: u64 = 0;

        loop {
            cycle += 1;
            transition(LoopState::Fetching);
            info!("Fetching stock data (cycle {})", cycle);
            let batch = match self.feed.collect() {
                Ok(batch) => batch,
                Err(e) => {
                    error!("Fetching stock data failed: {}", e);
                    StockBatch::default()
                }
            };

            if self.shutdown.requested() {
                break;
            }

            transition(LoopState::Publishing);
            publish_batch(&mut *connection.sink, &self.topic, &batch);

            transition(LoopState::Waiting);
            info!("Waiting {} seconds before next fetch...", self.interval.as_secs());
            if self.shutdown.wait(self.interval) {
                break;
            }
        }

        info!("Program stopped by user");
        transition(LoopState::Disconnecting);
        connection.close();
        transition(LoopState::Stopped);
        Ok(())
    }
}

fn transition(state: LoopState) {
    debug!("Publisher state: {}", state);
}

/// Serializes and publishes `batch`; failures are logged, never returned.
fn publish_batch<S: TelemetrySink + ?Sized>(sink: &mut S, topic: &str, batch: &StockBatch) {
    if batch.is_empty() {
        warn!("No stock records this cycle, nothing published");
        return;
    }
    let payload = match batch.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            error!("Failed to serialize stock batch: {}", e);
            return;
        }
    };
    info!("Publishing {} stock records to {}...", batch.len(), topic);
    match sink.publish(topic, &payload, QoS::AtLeastOnce) {
        Ok(()) => info!("Published successfully"),
        Err(e) => error!("Publish failed: {}", e),
    }
}

/// Open sink connection; disconnects when closed or dropped, whichever comes first.
struct Connection<'a, S: TelemetrySink> {
    sink: &'a mut S,
}

impl<S: TelemetrySink> Connection<'_, S> {
    fn close(self) {
        // Drop does the work.
    }
}

impl<S: TelemetrySink> Drop for Connection<'_, S> {
    fn drop(&mut self) {
        match self.sink.disconnect() {
            Ok(()) => info!("Disconnected from telemetry sink"),
            Err(e) => error!("Disconnect failed: {}", e),
        }
    }
}
