//! Validated publisher configuration built from [`Args`].

use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use stock_common::tickers::TickerParser;
use stock_common::{FeedError, Result, SymbolMapper, Ticker};

use crate::args::Args;
use crate::model::aggregator::ReferencePacing;
use crate::sink::https::HttpsSettings;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Where batches are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkConfig {
    /// Log payloads only.
    DryRun,
    /// AWS IoT Core over HTTPS.
    Https(HttpsSettings),
}

/// Everything the publisher needs, checked once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub sink: SinkConfig,
    pub topic: String,
    pub interval: Duration,
    pub pacing: ReferencePacing,
    pub mapper: SymbolMapper,
    pub tickers: Vec<Ticker>,
}

impl PublisherConfig {
    /// Validate `args` and load the ticker file if one is given.
    pub fn from_args(args: Args) -> Result<Self> {
        if args.batch_size == 0 {
            return Err(FeedError::Config("--batch-size must be at least 1".to_string()));
        }
        let topic = args.topic.trim().to_string();
        if topic.is_empty() {
            return Err(FeedError::Config("--topic must not be empty".to_string()));
        }

        let tickers = match args.tickers.as_deref() {
            Some(raw) => load_tickers(&normalize_path(raw))?,
            None => Ticker::defaults(),
        };
        info!("Tickers: {:?}", tickers);

        let sink = if args.dry_run {
            SinkConfig::DryRun
        } else {
            SinkConfig::Https(HttpsSettings {
                endpoint: required(args.endpoint, "--endpoint")?,
                cert_path: normalize_path(&required(args.cert_path, "--cert-path")?),
                key_path: normalize_path(&required(args.key_path, "--key-path")?),
                ca_path: normalize_path(&required(args.ca_path, "--ca-path")?),
                client_id: args.client_id,
                connect_timeout: CONNECT_TIMEOUT,
                operation_timeout: OPERATION_TIMEOUT,
            })
        };

        Ok(Self {
            sink,
            topic,
            interval: Duration::from_secs(args.interval_secs),
            pacing: ReferencePacing {
                batch_size: args.batch_size,
                batch_pause: Duration::from_secs(args.batch_pause_secs),
            },
            mapper: SymbolMapper::new(args.symbol_suffix.trim()),
            tickers,
        })
    }
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| FeedError::Config(format!("{} is required unless --dry-run is set", flag)))
}

fn load_tickers(path: &PathBuf) -> Result<Vec<Ticker>> {
    if !is_file_exist(path) {
        return Err(FeedError::Config(format!(
            "tickers file {} does not exist",
            path.display()
        )));
    }
    let file = File::open(path)?;
    Ticker::parse_from_file(BufReader::new(file))
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

fn is_file_exist(path: &PathBuf) -> bool {
    path.exists() && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn parse(extra: &[&str]) -> Result<PublisherConfig> {
        let argv = std::iter::once("stock_publisher").chain(extra.iter().copied());
        PublisherConfig::from_args(Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn dry_run_uses_defaults() {
        let config = parse(&["--dry-run"]).unwrap();
        assert_eq!(config.sink, SinkConfig::DryRun);
        assert_eq!(config.topic, "stocks/quotes");
        assert_eq!(config.interval, Duration::from_secs(100));
        assert_eq!(config.pacing, ReferencePacing::default());
        assert_eq!(config.mapper, SymbolMapper::default());
        assert_eq!(config.tickers, Ticker::defaults());
    }

    #[test]
    fn https_sink_needs_endpoint_and_credentials() {
        let err = parse(&["--endpoint", "abc-ats.iot.amazonaws.com"]).unwrap_err();
        assert!(err.to_string().contains("--cert-path"));

        let config = parse(&[
            "--endpoint",
            " abc-ats.iot.amazonaws.com ",
            "--cert-path",
            "\"certs/device.pem.crt\"",
            "--key-path",
            "certs/private.pem.key",
            "--ca-path",
            "certs/AmazonRootCA1.pem",
            "--client-id",
            "bse-feed",
        ])
        .unwrap();
        match config.sink {
            SinkConfig::Https(settings) => {
                assert_eq!(settings.endpoint, "abc-ats.iot.amazonaws.com");
                assert_eq!(settings.cert_path, PathBuf::from("certs/device.pem.crt"));
                assert_eq!(settings.client_id, "bse-feed");
                assert_eq!(settings.connect_timeout, Duration::from_secs(10));
                assert_eq!(settings.operation_timeout, Duration::from_secs(5));
            }
            other => panic!("unexpected sink {:?}", other),
        }
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = parse(&["--dry-run", "--batch-size", "0"]).unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));
    }

    #[test]
    fn blank_topic_is_rejected() {
        assert!(parse(&["--dry-run", "--topic", "  "]).is_err());
    }

    #[test]
    fn tickers_are_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tcs, infy  # IT").unwrap();
        writeln!(file, "RELIANCE").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = parse(&["--dry-run", "--tickers", &path, "--symbol-suffix", ".BO"]).unwrap();
        let names: Vec<&str> = config.tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(names, ["TCS", "INFY", "RELIANCE"]);
        assert_eq!(config.mapper, SymbolMapper::new(".BO"));
    }

    #[test]
    fn missing_tickers_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let err = parse(&["--dry-run", "--tickers", path.to_str().unwrap()]).unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));
    }

    #[test]
    fn normalize_path_strips_matching_quotes() {
        assert_eq!(normalize_path("  \"a b/c.txt\" "), PathBuf::from("a b/c.txt"));
        assert_eq!(normalize_path("\"unterminated"), PathBuf::from("\"unterminated"));
    }
}
