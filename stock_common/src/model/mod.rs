//! Data model shared by the aggregator and the publishing loop.
//!
//! - `quote`: `QuoteRecord` from the primary quote source and its derived fields.
//! - `reference`: `ReferenceRecord` from the secondary reference source.
//! - `stock_info`: the enriched `StockInfo` record and the published `StockBatch`.

pub mod quote;
pub mod reference;
pub mod stock_info;

pub use quote::QuoteRecord;
pub use reference::ReferenceRecord;
pub use stock_info::{StockBatch, StockInfo};
