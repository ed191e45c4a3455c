//! Yahoo Finance reference source.
//!
//! Sector, industry, market cap, 52-week range and volume are read from the
//! `quoteSummary` endpoint (`summaryProfile` + `summaryDetail` modules).
//! The endpoint needs a cookie and a matching crumb; both are obtained once
//! per batch, so a failed handshake fails the whole batch while a failed
//! symbol only affects that symbol.

use log::debug;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url, header};
use serde::Deserialize;

use stock_common::model::ReferenceRecord;
use stock_common::model::reference::UNKNOWN;
use stock_common::{FeedError, Result};

use super::{ReferenceReply, ReferenceSource, USER_AGENT};

const PROVIDER: &str = "YAHOO";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary/";
const MODULES: &str = "summaryProfile,summaryDetail";

/// Reference source backed by Yahoo Finance.
pub struct YahooReferenceSource {
    client: Client,
}

/// Cookie/crumb pair authorising `quoteSummary` calls.
struct Crumb {
    cookie: String,
    crumb: String,
}

impl YahooReferenceSource {
    /// Build the HTTP client used for every batch.
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    fn handshake(&self) -> Result<Crumb> {
        // fc.yahoo.com answers 404 but still sets the session cookie.
        let response = self.client.get(COOKIE_URL).send()?;
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(';').next())
            .map(str::to_string)
            .ok_or_else(|| handshake_error("no session cookie"))?;

        let response = self
            .client
            .get(CRUMB_URL)
            .header(header::COOKIE, &cookie)
            .send()?;
        if !response.status().is_success() {
            return Err(handshake_error(&format!(
                "crumb request returned HTTP {}",
                response.status().as_u16()
            )));
        }
        let crumb = response.text()?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(handshake_error("empty crumb"));
        }
        Ok(Crumb { cookie, crumb })
    }

    fn summary(&self, symbol: &str, crumb: &Crumb) -> Result<Option<ReferenceRecord>> {
        let mut url = Url::parse(SUMMARY_URL).map_err(|e| FeedError::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FeedError::Config(format!("{} cannot be a base", SUMMARY_URL)))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("modules", MODULES)
            .append_pair("crumb", &crumb.crumb);

        let response = self
            .client
            .get(url.clone())
            .header(header::COOKIE, &crumb.cookie)
            .send()?;
        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                return Err(FeedError::HttpStatus {
                    provider: PROVIDER,
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            _ => {}
        }
        let summary: QuoteSummaryResponse = response.json()?;
        Ok(summary.into_record())
    }
}

impl ReferenceSource for YahooReferenceSource {
    fn fetch_batch(&self, symbols: &[String]) -> Result<ReferenceReply> {
        let crumb = self.handshake()?;
        debug!("Yahoo crumb acquired for batch of {}", symbols.len());
        Ok(symbols
            .iter()
            .map(|symbol| (symbol.clone(), self.summary(symbol, &crumb)))
            .collect())
    }
}

fn handshake_error(message: &str) -> FeedError {
    FeedError::Handshake {
        provider: PROVIDER,
        message: message.to_string(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    summary_profile: Option<SummaryProfile>,
    summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Deserialize)]
struct SummaryProfile {
    sector: Option<String>,
    industry: Option<String>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`, or `{}` when absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    market_cap: Option<RawValue>,
    fifty_two_week_high: Option<RawValue>,
    fifty_two_week_low: Option<RawValue>,
    volume: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

impl QuoteSummaryResponse {
    fn into_record(self) -> Option<ReferenceRecord> {
        let result = self.quote_summary.result?.into_iter().next()?;
        let (sector, industry) = match result.summary_profile {
            Some(p) => (label(p.sector), label(p.industry)),
            None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
        };
        let detail = result.summary_detail.unwrap_or_default();
        Some(ReferenceRecord {
            sector,
            industry,
            market_cap: non_negative(&detail.market_cap).map(|v| v as u64),
            fifty_two_week_high: raw(&detail.fifty_two_week_high),
            fifty_two_week_low: raw(&detail.fifty_two_week_low),
            volume: non_negative(&detail.volume).map(|v| v as u64),
        })
    }
}

fn label(value: Option<String>) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw).filter(|v| v.is_finite())
}

fn non_negative(value: &Option<RawValue>) -> Option<f64> {
    raw(value).filter(|v| *v >= 0.0)
}
