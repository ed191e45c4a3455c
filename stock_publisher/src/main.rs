//! Stock Publisher: periodically aggregates live BSE quotes with Yahoo Finance
//! reference data and publishes the enriched batch to AWS IoT Core.
//!
//! Each cycle fetches a quote for every configured ticker, merges it with the
//! ticker's reference record, fills the remaining fields with synthetic values
//! and publishes the whole batch as one JSON document. Ctrl+C stops the loop
//! and disconnects from the sink.
//!
//! Usage example (CLI):
//! ```bash
//! stock_publisher --endpoint xxxx-ats.iot.ap-south-1.amazonaws.com \
//!     --cert-path ./certs/device.pem.crt --key-path ./certs/private.pem.key \
//!     --ca-path ./certs/AmazonRootCA1.pem --tickers ./tickers.txt
//! ```
//!
//! Every flag can also be set through the environment or a `.env` file; see
//! `args::Args`. `--dry-run` logs the payloads instead of sending them.
#![warn(missing_docs)]
mod args;
mod config;
mod model;
mod publisher;
mod shutdown;
mod sink;
mod source;

use clap::Parser;
use crossbeam_channel::unbounded;
use log::info;
use std::time::Duration;

use stock_common::FeedError;

use crate::args::Args;
use crate::config::{PublisherConfig, SinkConfig};
use crate::model::aggregator::Aggregator;
use crate::model::filler::UniformFiller;
use crate::publisher::{Publisher, StockFeed};
use crate::shutdown::Shutdown;
use crate::sink::https::HttpsSink;
use crate::sink::{LogSink, TelemetrySink};
use crate::source::bse::BseQuoteSource;
use crate::source::yahoo::YahooReferenceSource;

fn main() -> Result<(), FeedError> {
    dotenvy::dotenv().ok();
    init_logger();
    let config = PublisherConfig::from_args(Args::parse())?;

    let (stop, signal) = unbounded();
    let shutdown = Shutdown::new(signal);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down publisher...");
        let _ = stop.send(());
    })
    .map_err(|e| FeedError::Config(format!("cannot install Ctrl+C handler: {}", e)))?;

    let feed = Aggregator::new(
        BseQuoteSource::new(),
        YahooReferenceSource::new()?,
        UniformFiller::new(),
        config.mapper,
        config.tickers,
        config.pacing,
    )
    .with_shutdown(shutdown.clone());

    info!("Publisher is running. Press Ctrl+C to exit.");
    match config.sink {
        SinkConfig::DryRun => run(LogSink::new(), feed, config.topic, config.interval, shutdown),
        SinkConfig::Https(settings) => run(
            HttpsSink::new(settings),
            feed,
            config.topic,
            config.interval,
            shutdown,
        ),
    }
}

fn run<S: TelemetrySink, F: StockFeed>(
    sink: S,
    feed: F,
    topic: String,
    interval: Duration,
    shutdown: Shutdown,
) -> Result<(), FeedError> {
    Publisher::new(sink, feed, topic, interval, shutdown).run()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
