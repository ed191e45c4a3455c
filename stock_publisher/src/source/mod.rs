//! Market-data collaborators of the aggregator.
//!
//! - `QuoteSource` / `QuoteSession`: primary live quotes, one scoped session
//!   per ticker. Dropping the session releases whatever it acquired.
//! - `ReferenceSource`: secondary descriptive/statistical data, fetched in
//!   capped batches.
//! - `bse`: BSE India implementation of the quote source.
//! - `yahoo`: Yahoo Finance implementation of the reference source.
//!
//! Sources answer `Ok(None)` when they have nothing for a symbol and reserve
//! `Err` for calls that failed.

use stock_common::model::{QuoteRecord, ReferenceRecord};
use stock_common::{Result, Ticker};

pub mod bse;
pub mod yahoo;

/// Browser-like user agent; both public APIs reject bare HTTP clients.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Opens sessions against the primary quote source.
pub trait QuoteSource {
    /// Acquire a session; it is released when dropped.
    fn open_session(&self) -> Result<Box<dyn QuoteSession + '_>>;
}

/// A live connection to the primary quote source.
pub trait QuoteSession {
    /// Latest quote for `ticker`, or `None` if the source has none.
    fn quote(&mut self, ticker: &Ticker) -> Result<Option<QuoteRecord>>;
}

/// Per-symbol outcome of a reference batch, keyed by reference symbol.
pub type ReferenceReply = Vec<(String, Result<Option<ReferenceRecord>>)>;

/// Batched access to the secondary reference source.
pub trait ReferenceSource {
    /// Fetch reference data for every symbol in `symbols`.
    ///
    /// `Err` means the whole batch failed; per-symbol failures are reported
    /// inside the reply.
    fn fetch_batch(&self, symbols: &[String]) -> Result<ReferenceReply>;
}
