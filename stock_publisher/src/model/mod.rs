//! Assembly of the published records.
//!
//! - `aggregator`: runs the reference and primary passes of a cycle.
//! - `synthesis`: completes a quote into a fully populated `StockInfo`.
//! - `filler`: random or scripted values for fields no source provides.
pub mod aggregator;
pub mod filler;
pub mod synthesis;
