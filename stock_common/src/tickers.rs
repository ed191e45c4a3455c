//! Ticker symbols, ticker file parsing and reference-symbol mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::FeedError;

/// Scrip names published when no ticker file is configured.
pub const DEFAULT_TICKERS: &[&str] = &[
    "RELIANCE",
    "TCS",
    "HDFCBANK",
    "INFY",
    "ICICIBANK",
    "HINDUNILVR",
    "ITC",
    "SBIN",
    "BHARTIARTL",
    "KOTAKBANK",
    "LT",
    "AXISBANK",
    "ASIANPAINT",
    "MARUTI",
    "SUNPHARMA",
    "TITAN",
    "ULTRACEMCO",
    "BAJFINANCE",
    "NESTLEIND",
    "WIPRO",
    "HCLTECH",
    "TECHM",
    "POWERGRID",
    "NTPC",
    "ONGC",
    "TATASTEEL",
    "JSWSTEEL",
    "M&M",
    "INDUSINDBK",
    "BAJAJFINSV",
];

/// Suffix that turns a scrip name into its NSE listing on the reference source.
pub const DEFAULT_SYMBOL_SUFFIX: &str = ".NS";

/// Identifier of a tradeable instrument, always upper case and non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// The symbol as the primary source knows it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The compiled-in ticker list.
    pub fn defaults() -> Vec<Ticker> {
        DEFAULT_TICKERS
            .iter()
            .map(|s| Ticker(s.to_string()))
            .collect()
    }
}

impl FromStr for Ticker {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(FeedError::InvalidTicker(s.to_string()));
        }
        Ok(Ticker(trimmed.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Ticker {
    type Error = FeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait providing file parsing for tickers.
pub trait TickerParser {
    /// Parses tickers from a buffered reader.
    ///
    /// Symbols may be separated by commas, whitespace or new lines; anything
    /// after `#` on a line is a comment. Duplicates keep their first position.
    /// Returns an error if a line cannot be read or the file holds no symbol.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Ticker>, FeedError>;
}

impl TickerParser for Ticker {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, FeedError> {
        let mut tickers: Vec<Ticker> = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(FeedError::Io)?;
            let content = line.split('#').next().unwrap_or_default();

            for token in content.split(|c: char| c == ',' || c.is_whitespace()) {
                if token.is_empty() {
                    continue;
                }
                let ticker: Ticker = token
                    .parse()
                    .map_err(|e: FeedError| FeedError::ParseTickersFile(e.to_string()))?;
                if !tickers.contains(&ticker) {
                    tickers.push(ticker);
                }
            }
        }

        if tickers.is_empty() {
            return Err(FeedError::ParseTickersFile(
                "no ticker symbols found".to_string(),
            ));
        }
        Ok(tickers)
    }
}

/// Maps a `Ticker` to the symbol the reference source expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMapper {
    suffix: String,
}

impl SymbolMapper {
    /// Creates a mapper that appends `suffix` to every ticker.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Reference-source symbol for `ticker`.
    pub fn reference_symbol(&self, ticker: &Ticker) -> String {
        format!("{}{}", ticker.as_str(), self.suffix)
    }
}

impl Default for SymbolMapper {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL_SUFFIX)
    }
}
