//! BSE India quote source.
//!
//! Quotes come from the exchange's public JSON API. A ticker is first
//! resolved to its numeric scrip code through the active-equity listing,
//! which is downloaded once and cached for the life of the source. Every
//! session owns its own HTTP client, dropped when the session ends.
//!
//! BSE reports prices as strings (`"2,931.05"`) or numbers depending on the
//! endpoint, so numeric fields go through `parse_number`.

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;

use stock_common::model::QuoteRecord;
use stock_common::{FeedError, Result, Ticker};

use super::{QuoteSession, QuoteSource, USER_AGENT};

const PROVIDER: &str = "BSE";
const API_BASE: &str = "https://api.bseindia.com/BseIndiaAPI/api";
const REFERER: &str = "https://www.bseindia.com/";

/// Primary quote source backed by the BSE India API.
pub struct BseQuoteSource {
    api_base: String,
    /// scrip id (e.g. `RELIANCE`) -> scrip code (e.g. `500325`).
    scrip_codes: RefCell<Option<HashMap<String, String>>>,
}

impl BseQuoteSource {
    /// Source pointed at the public BSE API.
    pub fn new() -> Self {
        Self::with_base(API_BASE)
    }

    /// Source pointed at another deployment of the same API.
    pub fn with_base(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            scrip_codes: RefCell::new(None),
        }
    }

    fn scrip_code(&self, client: &Client, ticker: &Ticker) -> Result<String> {
        if self.scrip_codes.borrow().is_none() {
            let codes = self.load_scrip_codes(client)?;
            info!("Loaded {} BSE scrip codes", codes.len());
            *self.scrip_codes.borrow_mut() = Some(codes);
        }
        self.scrip_codes
            .borrow()
            .as_ref()
            .and_then(|codes| codes.get(ticker.as_str()).cloned())
            .ok_or_else(|| FeedError::UnknownScrip(ticker.to_string()))
    }

    fn load_scrip_codes(&self, client: &Client) -> Result<HashMap<String, String>> {
        let url = format!(
            "{}/ListofScripData/w?Group=&Scripcode=&industry=&segment=Equity&status=Active",
            self.api_base
        );
        let body = get_text(client, &url)?;
        parse_scrip_listing(&body)
    }
}

impl Default for BseQuoteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteSource for BseQuoteSource {
    fn open_session(&self) -> Result<Box<dyn QuoteSession + '_>> {
        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        debug!("BSE session opened");
        Ok(Box::new(BseSession {
            source: self,
            client,
        }))
    }
}

struct BseSession<'a> {
    source: &'a BseQuoteSource,
    client: Client,
}

impl QuoteSession for BseSession<'_> {
    fn quote(&mut self, ticker: &Ticker) -> Result<Option<QuoteRecord>> {
        let code = self.source.scrip_code(&self.client, ticker)?;
        let url = format!(
            "{}/getScripHeaderData/w?Debtflag=&scripcode={}&seriesid=",
            self.source.api_base, code
        );
        let body = get_text(&self.client, &url)?;
        parse_scrip_header(ticker, &body)
    }
}

impl Drop for BseSession<'_> {
    fn drop(&mut self) {
        debug!("BSE session closed");
    }
}

fn get_text(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::HttpStatus {
            provider: PROVIDER,
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text()?)
}

#[derive(Debug, Deserialize)]
struct ScripListing {
    #[serde(rename = "SCRIP_CD", deserialize_with = "string_or_number")]
    code: String,
    #[serde(rename = "scrip_id")]
    id: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn parse_scrip_listing(body: &str) -> Result<HashMap<String, String>> {
    let listings: Vec<ScripListing> = serde_json::from_str(body)?;
    Ok(listings
        .into_iter()
        .filter_map(|l| {
            let id = l.id?.trim().to_ascii_uppercase();
            (!id.is_empty()).then_some((id, l.code))
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct ScripHeader {
    #[serde(rename = "Header")]
    header: Option<Map<String, Value>>,
    #[serde(rename = "CurrRate")]
    current_rate: Option<Map<String, Value>>,
}

fn parse_scrip_header(ticker: &Ticker, body: &str) -> Result<Option<QuoteRecord>> {
    let ScripHeader {
        header,
        current_rate,
    } = serde_json::from_str(body)?;
    let Some(header) = header else {
        return Ok(None);
    };
    let current_rate = current_rate.unwrap_or_default();

    let ltp = match field(&header, "LTP")?.or(field(&current_rate, "LTP")?) {
        Some(ltp) => ltp,
        None => return Ok(None),
    };
    let required = |name: &'static str| -> Result<f64> {
        field(&header, name)?.ok_or_else(|| FeedError::MissingField {
            symbol: ticker.to_string(),
            field: name,
        })
    };

    Ok(Some(QuoteRecord {
        prev_close: required("PrevClose")?,
        open: required("Open")?,
        high: required("High")?,
        low: required("Low")?,
        ltp,
        vwap: reported(field(&header, "VWAP")?),
        change: reported(field(&current_rate, "Chg")?),
        percentage_change: reported(field(&current_rate, "PcChg")?),
    }))
}

/// BSE publishes 0 for figures it has not computed yet (e.g. VWAP before the open).
fn reported(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn field(map: &Map<String, Value>, name: &'static str) -> Result<Option<f64>> {
    match map.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse_number(name, value),
    }
}

/// Accepts JSON numbers and strings like `"2,931.05"`; blanks and `"-"` are absent.
fn parse_number(name: &'static str, value: &Value) -> Result<Option<f64>> {
    let invalid = || FeedError::InvalidNumber {
        field: name,
        value: value.to_string(),
    };
    match value {
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(invalid),
        Value::String(s) => {
            let cleaned = s.trim().replace(',', "");
            if cleaned.is_empty() || cleaned == "-" {
                return Ok(None);
            }
            let parsed: f64 = cleaned.parse().map_err(|_| invalid())?;
            if parsed.is_finite() {
                Ok(Some(parsed))
            } else {
                Err(invalid())
            }
        }
        _ => Err(invalid()),
    }
}
