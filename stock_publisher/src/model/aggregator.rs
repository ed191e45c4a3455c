//! Quote aggregation: two data sources in, one `StockBatch` out.
//!
//! A cycle runs in two passes:
//! 1. Reference pass: every ticker is mapped to its reference symbol and the
//!    reference source is queried in batches of `batch_size`, pausing
//!    `batch_pause` after each batch. Failed symbols or batches leave gaps.
//! 2. Primary pass: tickers are quoted one by one, each inside its own
//!    source session, then merged with their reference record and completed
//!    by `synthesis::enrich`. A ticker whose quote fails is left out.
//!
//! Neither pass aborts the cycle: failures are logged and skipped. A shutdown
//! request ends the cycle early; it is checked before every reference batch
//! and every ticker, and interrupts the pause between batches.

use chrono::Local;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use stock_common::model::{QuoteRecord, ReferenceRecord, StockBatch};
use stock_common::{Fetched, Result, SkipReason, SymbolMapper, Ticker};

use crate::model::filler::Filler;
use crate::model::synthesis;
use crate::publisher::StockFeed;
use crate::shutdown::Shutdown;
use crate::source::{QuoteSource, ReferenceSource};

/// Format of `basicInfo.timestamp`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Pacing of the reference pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePacing {
    /// Symbols per reference request; at least 1.
    pub batch_size: usize,
    /// Pause after each reference batch.
    pub batch_pause: Duration,
}

impl Default for ReferencePacing {
    fn default() -> Self {
        Self {
            batch_size: 20,
            batch_pause: Duration::from_secs(1),
        }
    }
}

/// Builds one `StockBatch` per call from a quote source and a reference source.
pub struct Aggregator<Q, R, F> {
    quotes: Q,
    references: R,
    filler: F,
    mapper: SymbolMapper,
    tickers: Arc<[Ticker]>,
    pacing: ReferencePacing,
    shutdown: Shutdown,
}

impl<Q, R, F> Aggregator<Q, R, F>
where
    Q: QuoteSource,
    R: ReferenceSource,
    F: Filler,
{
    /// Create an aggregator for a fixed ticker list.
    pub fn new(
        quotes: Q,
        references: R,
        filler: F,
        mapper: SymbolMapper,
        tickers: Vec<Ticker>,
        pacing: ReferencePacing,
    ) -> Self {
        Self {
            quotes,
            references,
            filler,
            mapper,
            tickers: tickers.into(),
            pacing: ReferencePacing {
                batch_size: pacing.batch_size.max(1),
                ..pacing
            },
            shutdown: Shutdown::never(),
        }
    }

    /// Stop cycles early once `shutdown` is requested.
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Builds the records for `tickers`, in order, skipping tickers without a quote.
    pub fn aggregate(&mut self, tickers: &[Ticker]) -> StockBatch {
        let references = self.reference_pass(tickers);
        let mut batch = StockBatch::default();

        for ticker in tickers {
            if self.shutdown.requested() {
                info!(
                    "Shutdown requested, cycle stopped after {} of {} tickers",
                    batch.len(),
                    tickers.len()
                );
                break;
            }
            let quote = match self.fetch_quote(ticker) {
                Fetched::Data(quote) => quote,
                Fetched::Skip(SkipReason::NoData) => {
                    debug!("No quote available for {}, skipping", ticker);
                    continue;
                }
                Fetched::Skip(SkipReason::Transient(e)) => {
                    warn!("Error fetching data for {}: {}", ticker, e);
                    continue;
                }
                Fetched::Fatal(e) => {
                    error!("Cannot fetch data for {} (check configuration): {}", ticker, e);
                    continue;
                }
            };

            let symbol = self.mapper.reference_symbol(ticker);
            let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
            batch.stocks.push(synthesis::enrich(
                ticker,
                &quote,
                references.get(&symbol),
                &mut self.filler,
                timestamp,
            ));
        }

        info!(
            "Built {} of {} stock records ({} skipped, {} reference records)",
            batch.len(),
            tickers.len(),
            tickers.len() - batch.len(),
            references.len()
        );
        batch
    }

    /// One session per ticker; the session is released before returning.
    fn fetch_quote(&self, ticker: &Ticker) -> Fetched<QuoteRecord> {
        let mut session = match self.quotes.open_session() {
            Ok(session) => session,
            Err(e) => return e.into(),
        };
        session.quote(ticker).into()
    }

    fn reference_pass(&self, tickers: &[Ticker]) -> HashMap<String, ReferenceRecord> {
        let symbols: Vec<String> = tickers
            .iter()
            .map(|t| self.mapper.reference_symbol(t))
            .collect();
        let mut records = HashMap::new();

        for (index, chunk) in symbols.chunks(self.pacing.batch_size).enumerate() {
            if self.shutdown.requested() {
                break;
            }
            match self.references.fetch_batch(chunk) {
                Ok(reply) => {
                    for (symbol, result) in reply {
                        match Fetched::from(result) {
                            Fetched::Data(record) => {
                                records.insert(symbol, record);
                            }
                            Fetched::Skip(SkipReason::NoData) => {
                                debug!("No reference data for {}", symbol);
                            }
                            Fetched::Skip(SkipReason::Transient(e)) => {
                                warn!("Could not get reference data for {}: {}", symbol, e);
                            }
                            Fetched::Fatal(e) => {
                                error!("Reference data for {} rejected: {}", symbol, e);
                            }
                        }
                    }
                }
                Err(e) => warn!(
                    "Reference batch {} ({} symbols) failed: {}",
                    index + 1,
                    chunk.len(),
                    e
                ),
            }
            if self.shutdown.wait(self.pacing.batch_pause) {
                debug!("Reference pass interrupted after batch {}", index + 1);
                break;
            }
        }
        records
    }
}

impl<Q, R, F> StockFeed for Aggregator<Q, R, F>
where
    Q: QuoteSource,
    R: ReferenceSource,
    F: Filler,
{
    fn collect(&mut self) -> Result<StockBatch> {
        let tickers = Arc::clone(&self.tickers);
        Ok(self.aggregate(&tickers))
    }
}
