//! Telemetry sink: where published batches go.
//!
//! The publishing loop only knows the narrow `TelemetrySink` contract:
//! connect once, publish once per cycle, disconnect once. Transport concerns
//! (TLS, credentials, endpoints) stay inside the implementations:
//! - `https::HttpsSink`: AWS IoT Core HTTPS publish with mutual TLS.
//! - `LogSink`: dry-run sink that only logs what would be sent.

use log::{debug, info};
use strum_macros::Display;

use stock_common::Result;

pub mod https;

/// MQTT delivery guarantee requested for a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum QoS {
    /// Fire and forget.
    #[strum(serialize = "0")]
    AtMostOnce = 0,
    /// Delivered, possibly more than once.
    #[strum(serialize = "1")]
    AtLeastOnce = 1,
    /// Delivered exactly once.
    #[strum(serialize = "2")]
    ExactlyOnce = 2,
}

impl QoS {
    /// Numeric level as used on the wire.
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Destination of the published stock batches.
pub trait TelemetrySink {
    /// Establish the connection; failure is fatal for the publisher.
    fn connect(&mut self) -> Result<()>;

    /// Publish `payload` on `topic`.
    fn publish(&mut self, topic: &str, payload: &str, qos: QoS) -> Result<()>;

    /// Tear the connection down.
    fn disconnect(&mut self) -> Result<()>;
}

/// Sink used with `--dry-run`: logs instead of sending.
#[derive(Debug, Default)]
pub struct LogSink {
    published: usize,
}

impl LogSink {
    /// Create a dry-run sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetrySink for LogSink {
    fn connect(&mut self) -> Result<()> {
        info!("Dry run: payloads are logged, not sent");
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &str, qos: QoS) -> Result<()> {
        self.published += 1;
        info!(
            "Dry run publish #{} to '{}' (QoS {}): {} bytes",
            self.published,
            topic,
            qos,
            payload.len()
        );
        debug!("{}", payload);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        info!("Dry run finished after {} publishes", self.published);
        Ok(())
    }
}
