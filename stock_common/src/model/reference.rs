//! Reference snapshot from the secondary source.

use serde::{Deserialize, Serialize};

/// Sector/industry label used when the source has none.
pub const UNKNOWN: &str = "Unknown";

/// Descriptive and statistical fields for one reference symbol.
///
/// Every numeric field is optional: the source may omit any of them and the
/// aggregator synthesizes what is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Sector name.
    pub sector: String,
    /// Industry name.
    pub industry: String,
    /// Market capitalization.
    pub market_cap: Option<u64>,
    /// 52-week high.
    pub fifty_two_week_high: Option<f64>,
    /// 52-week low.
    pub fifty_two_week_low: Option<f64>,
    /// Latest session volume.
    pub volume: Option<u64>,
}

impl Default for ReferenceRecord {
    fn default() -> Self {
        Self {
            sector: UNKNOWN.to_string(),
            industry: UNKNOWN.to_string(),
            market_cap: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            volume: None,
        }
    }
}
