//! Quote snapshot from the primary market-data source.
//!
//! Open/high/low/close/last price are always present. VWAP and the change
//! figures are optional on the wire; when absent they are derived here from
//! the prices so the aggregator only decides where the jitter comes from.

use serde::{Deserialize, Serialize};

use crate::numeric::round_to;

/// Live quote for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Previous session close.
    pub prev_close: f64,
    /// Session open.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Last traded price.
    pub ltp: f64,
    /// Volume-weighted average price, when the source reports it.
    pub vwap: Option<f64>,
    /// Absolute change against the previous close, when reported.
    pub change: Option<f64>,
    /// Percentage change against the previous close, when reported.
    pub percentage_change: Option<f64>,
}

impl QuoteRecord {
    /// VWAP as reported, otherwise the open/last midpoint shifted by `jitter`.
    pub fn vwap_or_estimate(&self, jitter: f64) -> f64 {
        self.vwap
            .unwrap_or_else(|| round_to((self.open + self.ltp) / 2.0 + jitter, 2))
    }

    /// Change as reported, otherwise `ltp - prev_close`.
    pub fn change_or_derived(&self) -> f64 {
        self.change
            .unwrap_or_else(|| round_to(self.ltp - self.prev_close, 2))
    }

    /// Percentage change as reported, otherwise derived from `change`.
    ///
    /// A non-positive previous close yields exactly `0.0`.
    pub fn percentage_change_or_derived(&self, change: f64) -> f64 {
        self.percentage_change.unwrap_or_else(|| {
            if self.prev_close > 0.0 {
                round_to(change / self.prev_close * 100.0, 2)
            } else {
                0.0
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(prev_close: f64, open: f64, ltp: f64) -> QuoteRecord {
        QuoteRecord {
            prev_close,
            open,
            high: ltp.max(open),
            low: ltp.min(open),
            ltp,
            vwap: None,
            change: None,
            percentage_change: None,
        }
    }

    #[test]
    fn derives_missing_fields() {
        let quote = bare(100.0, 98.0, 102.0);
        let change = quote.change_or_derived();
        assert_eq!(change, 2.0);
        assert_eq!(quote.percentage_change_or_derived(change), 2.0);
        assert_eq!(quote.vwap_or_estimate(0.0), 100.0);
        assert_eq!(quote.vwap_or_estimate(0.5), 100.5);
        assert_eq!(quote.vwap_or_estimate(-0.5), 99.5);
    }

    #[test]
    fn zero_previous_close_gives_zero_percentage() {
        let quote = bare(0.0, 10.0, 12.0);
        let change = quote.change_or_derived();
        assert_eq!(change, 12.0);
        assert_eq!(quote.percentage_change_or_derived(change), 0.0);
    }

    #[test]
    fn reported_values_are_kept_verbatim() {
        let quote = QuoteRecord {
            vwap: Some(101.237),
            change: Some(1.5),
            percentage_change: Some(1.49),
            ..bare(100.0, 98.0, 102.0)
        };
        assert_eq!(quote.vwap_or_estimate(0.4), 101.237);
        assert_eq!(quote.change_or_derived(), 1.5);
        assert_eq!(quote.percentage_change_or_derived(1.5), 1.49);
    }

    #[test]
    fn derived_percentage_uses_reported_change() {
        let quote = QuoteRecord {
            change: Some(5.0),
            ..bare(200.0, 198.0, 202.0)
        };
        let change = quote.change_or_derived();
        assert_eq!(quote.percentage_change_or_derived(change), 2.5);
    }

    #[test]
    fn derived_percentage_rounds_halves_to_even() {
        let quote = bare(32.0, 32.0, 33.0);
        let change = quote.change_or_derived();
        assert_eq!(change, 1.0);
        assert_eq!(quote.percentage_change_or_derived(change), 3.12);
    }
}
