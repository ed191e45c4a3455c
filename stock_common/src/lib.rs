//!
//! Common types and utilities shared by the stock publisher.
//!
//! This crate aggregates:
//! - `error`: unified error type `FeedError` and the `Result` alias used across the workspace.
//! - `outcome`: `Fetched<T>` classification of a single data-source call.
//! - `tickers`: ticker symbols, ticker file parsing and reference-symbol mapping.
//! - `model`: quote, reference and enriched `StockInfo` records.
//! - `numeric`: rounding and percentage formatting used by the wire format.
#![warn(missing_docs)]
pub mod error;
pub mod model;
pub mod numeric;
pub mod outcome;
pub mod tickers;

pub use error::FeedError;
pub use outcome::{Fetched, SkipReason};
pub use error::Result;
pub use tickers::{SymbolMapper, Ticker};
