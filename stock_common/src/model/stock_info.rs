//! Enriched stock record and the batch published each cycle.
//!
//! Field names follow the JSON consumed downstream, hence the explicit
//! `serde(rename)` attributes. No field is optional: a `StockInfo` can only be
//! built fully populated, which is what keeps the published records uniform.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tickers::Ticker;

/// Fully populated record for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Ticker this record describes.
    #[serde(rename = "scripName")]
    pub scrip_name: Ticker,
    /// Prices, change figures and descriptive fields.
    #[serde(rename = "basicInfo")]
    pub basic_info: BasicInfo,
    /// 52-week range and volume statistics.
    #[serde(rename = "marketPerformance")]
    pub market_performance: MarketPerformance,
    /// Placeholder fundamentals.
    #[serde(rename = "financialMetrics")]
    pub financial_metrics: FinancialMetrics,
    /// Placeholder margins.
    #[serde(rename = "Profitability")]
    pub profitability: Profitability,
    /// Placeholder growth rates.
    #[serde(rename = "Growth")]
    pub growth: Growth,
    /// Placeholder technical indicators.
    #[serde(rename = "technicalIndicators")]
    pub technical_indicators: TechnicalIndicators,
    /// Placeholder valuation ratios.
    #[serde(rename = "Valuation")]
    pub valuation: Valuation,
}

/// Quote fields merged with reference data.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(rename = "PrevClose")]
    pub prev_close: f64,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "LTP")]
    pub ltp: f64,
    #[serde(rename = "VWAP")]
    pub vwap: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
    #[serde(rename = "Change")]
    pub change: f64,
    #[serde(rename = "Percentage Change")]
    pub percentage_change: f64,
    /// Local wall-clock time the record was assembled, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    pub sector: String,
    pub industry: String,
    #[serde(rename = "marketCap")]
    pub market_cap: u64,
}

/// 52-week range and volume.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPerformance {
    #[serde(rename = "52WeekHigh")]
    pub fifty_two_week_high: f64,
    #[serde(rename = "52WeekLow")]
    pub fifty_two_week_low: f64,
    pub volume: VolumeStats,
}

/// Current volume and its moving averages.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeStats {
    pub current: u64,
    #[serde(rename = "10D_avg")]
    pub avg_10d: f64,
    #[serde(rename = "50D_avg")]
    pub avg_50d: f64,
    #[serde(rename = "200D_avg")]
    pub avg_200d: f64,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    #[serde(rename = "PE_Ratio")]
    pub pe_ratio: f64,
    #[serde(rename = "EPS")]
    pub eps: f64,
    #[serde(rename = "ROE")]
    pub roe: f64,
    #[serde(rename = "ROCE")]
    pub roce: f64,
    #[serde(rename = "DebtEquity")]
    pub debt_equity: f64,
}

/// Margins rendered as percentage strings.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Profitability {
    pub gross_margin: String,
    pub net_margin: String,
    pub operating_margin: String,
}

/// Year-over-year growth rendered as percentage strings.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    #[serde(rename = "Revenue_Growth_YOY")]
    pub revenue_growth_yoy: String,
    #[serde(rename = "EPS_Growth_YOY")]
    pub eps_growth_yoy: String,
    #[serde(rename = "Net_Profit_Growth_YOY")]
    pub net_profit_growth_yoy: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    #[serde(rename = "RSI")]
    pub rsi: f64,
    #[serde(rename = "MACD")]
    pub macd: f64,
    #[serde(rename = "Stochastic")]
    pub stochastic: f64,
    #[serde(rename = "MovingAverages")]
    pub moving_averages: MovingAverages,
    #[serde(rename = "PivotPoints")]
    pub pivot_points: PivotPoints,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    #[serde(rename = "20D")]
    pub ma_20d: f64,
    #[serde(rename = "50D")]
    pub ma_50d: f64,
    #[serde(rename = "200D")]
    pub ma_200d: f64,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PivotPoints {
    pub resistance1: f64,
    pub support1: f64,
    pub resistance2: f64,
    pub support2: f64,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    #[serde(rename = "EV_EBITDA")]
    pub ev_ebitda: f64,
    #[serde(rename = "PE")]
    pub pe: f64,
    #[serde(rename = "PB")]
    pub pb: f64,
    #[serde(rename = "Dividend_Yield")]
    pub dividend_yield: String,
}

/// Records of one aggregation cycle, in ticker-list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockBatch {
    /// One entry per successfully fetched ticker.
    pub stocks: Vec<StockInfo>,
}

impl StockBatch {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    /// `true` when no ticker produced a record.
    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// Encodes the batch as the published `{"stocks": [...]}` JSON document.
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample() -> StockInfo {
        StockInfo {
            scrip_name: "TCS".parse().unwrap(),
            basic_info: BasicInfo {
                prev_close: 100.0,
                open: 98.0,
                high: 103.0,
                low: 97.5,
                ltp: 102.0,
                vwap: 100.12,
                volume: 9_901,
                change: 2.0,
                percentage_change: 2.0,
                timestamp: "2026-10-16 09:15:00".to_string(),
                sector: "Technology".to_string(),
                industry: "Information Technology Services".to_string(),
                market_cap: 15_000_000_000,
            },
            market_performance: MarketPerformance {
                fifty_two_week_high: 120.0,
                fifty_two_week_low: 80.0,
                volume: VolumeStats {
                    current: 9_901,
                    avg_10d: 10_000.5,
                    avg_50d: 9_800.25,
                    avg_200d: 9_950.0,
                },
            },
            financial_metrics: FinancialMetrics {
                pe_ratio: 25.0,
                eps: 4.2,
                roe: 18.5,
                roce: 21.0,
                debt_equity: 0.4,
            },
            profitability: Profitability {
                gross_margin: "30.0%".to_string(),
                net_margin: "12.3%".to_string(),
                operating_margin: "20.0%".to_string(),
            },
            growth: Growth {
                revenue_growth_yoy: "15.0%".to_string(),
                eps_growth_yoy: "11.0%".to_string(),
                net_profit_growth_yoy: "14.2%".to_string(),
            },
            technical_indicators: TechnicalIndicators {
                rsi: 55.0,
                macd: -0.2,
                stochastic: 61.0,
                moving_averages: MovingAverages {
                    ma_20d: 101.0,
                    ma_50d: 99.0,
                    ma_200d: 100.5,
                },
                pivot_points: PivotPoints {
                    resistance1: 104.0,
                    support1: 99.0,
                    resistance2: 105.0,
                    support2: 98.0,
                },
            },
            valuation: Valuation {
                ev_ebitda: 12.0,
                pe: 24.0,
                pb: 3.1,
                dividend_yield: "2.5%".to_string(),
            },
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["scripName"], "TCS");
        assert_eq!(value["basicInfo"]["Percentage Change"], 2.0);
        assert_eq!(value["basicInfo"]["marketCap"], 15_000_000_000u64);
        assert_eq!(value["marketPerformance"]["52WeekHigh"], 120.0);
        assert_eq!(value["marketPerformance"]["volume"]["200D_avg"], 9_950.0);
        assert_eq!(value["financialMetrics"]["PE_Ratio"], 25.0);
        assert_eq!(value["Profitability"]["GrossMargin"], "30.0%");
        assert_eq!(value["Growth"]["Net_Profit_Growth_YOY"], "14.2%");
        assert_eq!(value["technicalIndicators"]["MovingAverages"]["20D"], 101.0);
        assert_eq!(value["technicalIndicators"]["PivotPoints"]["Resistance2"], 105.0);
        assert_eq!(value["Valuation"]["Dividend_Yield"], "2.5%");
    }

    #[test]
    fn payload_wraps_records_in_stocks_array() {
        let batch = StockBatch {
            stocks: vec![sample(), sample()],
        };
        let payload: Value = serde_json::from_str(&batch.to_payload().unwrap()).unwrap();
        let stocks = payload["stocks"].as_array().unwrap();
        assert_eq!(stocks.len(), 2);
        assert_eq!(payload.as_object().unwrap().len(), 1);
    }

    #[test]
    fn empty_batch_serializes_to_empty_array() {
        let batch = StockBatch::default();
        assert!(batch.is_empty());
        assert_eq!(batch.to_payload().unwrap(), r#"{"stocks":[]}"#);
    }
}
