//! Merging of quote and reference data into a complete `StockInfo`.
//!
//! Source values win. Whatever is still missing afterwards is drawn from the
//! `Filler` using fixed ranges. The fundamentals, margins, growth, technical
//! indicators and valuation groups are always synthetic placeholders and are
//! drawn fresh for every record.

use stock_common::Ticker;
use stock_common::model::reference::UNKNOWN;
use stock_common::model::stock_info::{
    BasicInfo, FinancialMetrics, Growth, MarketPerformance, MovingAverages, PivotPoints,
    Profitability, TechnicalIndicators, Valuation, VolumeStats,
};
use stock_common::model::{QuoteRecord, ReferenceRecord, StockInfo};
use stock_common::numeric::{percent, round_to};

use crate::model::filler::Filler;

/// Assumed shares outstanding when the market cap is unknown.
const SHARES_OUTSTANDING: (u64, u64) = (100_000_000, 2_000_000_000);
const VWAP_JITTER: (f64, f64) = (-0.5, 0.5);
const HIGH_52W_FACTOR: (f64, f64) = (1.1, 1.3);
const LOW_52W_FACTOR: (f64, f64) = (0.7, 0.9);
const VOLUME_FACTOR: (f64, f64) = (0.75, 1.25);
/// Numerator of the price-to-volume heuristic: pricier scrips trade fewer shares.
const VOLUME_SCALE: f64 = 100_000.0;

/// Builds the record for `ticker`.
///
/// `timestamp` is stamped verbatim into `basicInfo.timestamp`.
pub fn enrich(
    ticker: &Ticker,
    quote: &QuoteRecord,
    reference: Option<&ReferenceRecord>,
    filler: &mut dyn Filler,
    timestamp: String,
) -> StockInfo {
    let ltp = quote.ltp;

    let vwap = match quote.vwap {
        Some(vwap) => vwap,
        None => quote.vwap_or_estimate(draw(filler, VWAP_JITTER)),
    };
    let change = quote.change_or_derived();
    let percentage_change = quote.percentage_change_or_derived(change);

    let (sector, industry) = reference
        .map(|r| (r.sector.clone(), r.industry.clone()))
        .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string()));

    let market_cap = reference
        .and_then(|r| r.market_cap)
        .unwrap_or_else(|| market_cap(filler, ltp));
    let fifty_two_week_high = reference
        .and_then(|r| r.fifty_two_week_high)
        .unwrap_or_else(|| round_to(ltp * draw(filler, HIGH_52W_FACTOR), 2));
    let fifty_two_week_low = reference
        .and_then(|r| r.fifty_two_week_low)
        .unwrap_or_else(|| round_to(ltp * draw(filler, LOW_52W_FACTOR), 2));
    let volume = reference
        .and_then(|r| r.volume)
        .unwrap_or_else(|| volume(filler, ltp));

    StockInfo {
        scrip_name: ticker.clone(),
        basic_info: BasicInfo {
            prev_close: quote.prev_close,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            ltp,
            vwap,
            volume,
            change,
            percentage_change,
            timestamp,
            sector,
            industry,
            market_cap,
        },
        market_performance: MarketPerformance {
            fifty_two_week_high,
            fifty_two_week_low,
            volume: volume_stats(filler, volume),
        },
        financial_metrics: FinancialMetrics {
            pe_ratio: rounded(filler, 5.0, 50.0),
            eps: rounded(filler, 1.0, 10.0),
            roe: rounded(filler, 5.0, 25.0),
            roce: rounded(filler, 5.0, 25.0),
            debt_equity: rounded(filler, 0.1, 2.0),
        },
        profitability: Profitability {
            gross_margin: percent(filler.uniform(0.1, 0.5)),
            net_margin: percent(filler.uniform(0.1, 0.5)),
            operating_margin: percent(filler.uniform(0.1, 0.5)),
        },
        growth: Growth {
            revenue_growth_yoy: percent(filler.uniform(0.1, 0.5)),
            eps_growth_yoy: percent(filler.uniform(0.1, 0.5)),
            net_profit_growth_yoy: percent(filler.uniform(0.1, 0.5)),
        },
        technical_indicators: TechnicalIndicators {
            rsi: rounded(filler, 30.0, 70.0),
            macd: rounded(filler, -1.0, 1.0),
            stochastic: rounded(filler, 0.0, 100.0),
            moving_averages: MovingAverages {
                ma_20d: around(filler, ltp, 0.9, 1.1),
                ma_50d: around(filler, ltp, 0.95, 1.05),
                ma_200d: around(filler, ltp, 0.98, 1.02),
            },
            pivot_points: PivotPoints {
                resistance1: around(filler, ltp, 0.95, 1.05),
                support1: around(filler, ltp, 0.95, 1.05),
                resistance2: around(filler, ltp, 0.95, 1.05),
                support2: around(filler, ltp, 0.95, 1.05),
            },
        },
        valuation: Valuation {
            ev_ebitda: rounded(filler, 5.0, 20.0),
            pe: rounded(filler, 5.0, 50.0),
            pb: rounded(filler, 0.5, 5.0),
            dividend_yield: percent(filler.uniform(0.01, 0.05)),
        },
    }
}

/// Estimated shares outstanding times the last price, truncated.
pub fn market_cap(filler: &mut dyn Filler, ltp: f64) -> u64 {
    let shares = filler.uniform_int(SHARES_OUTSTANDING.0, SHARES_OUTSTANDING.1);
    (shares as f64 * ltp) as u64
}

/// Session volume guessed from the price level.
pub fn volume(filler: &mut dyn Filler, ltp: f64) -> u64 {
    let base = (VOLUME_SCALE / ltp.max(1.0).sqrt()).trunc();
    (base * draw(filler, VOLUME_FACTOR)) as u64
}

/// Moving averages of the volume, jittered around `current`.
fn volume_stats(filler: &mut dyn Filler, current: u64) -> VolumeStats {
    let current_f = current as f64;
    VolumeStats {
        current,
        avg_10d: round_to(current_f * filler.uniform(0.9, 1.1), 2),
        avg_50d: round_to(current_f * filler.uniform(0.95, 1.05), 2),
        avg_200d: round_to(current_f * filler.uniform(0.98, 1.02), 2),
    }
}

fn draw(filler: &mut dyn Filler, (low, high): (f64, f64)) -> f64 {
    filler.uniform(low, high)
}

fn rounded(filler: &mut dyn Filler, low: f64, high: f64) -> f64 {
    round_to(filler.uniform(low, high), 2)
}

fn around(filler: &mut dyn Filler, ltp: f64, low: f64, high: f64) -> f64 {
    round_to(filler.uniform(low, high) * ltp, 2)
}
