//! Command-line arguments for the stock publisher.
//!
//! Every flag except `--dry-run` falls back to an environment variable, so the
//! publisher can be configured entirely from a `.env` file. Values are checked
//! in `config::PublisherConfig::from_args`.
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// AWS IoT Core data endpoint, e.g. `xxxx-ats.iot.ap-south-1.amazonaws.com`.
    #[clap(long, env = "AWS_IOT_MQTT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Device certificate (PEM).
    #[clap(long, env = "AWS_IOT_THING_CERTIFICATE_PATH")]
    pub cert_path: Option<String>,

    /// Device private key (PEM).
    #[clap(long, env = "AWS_IOT_THING_PRIVATE_KEY_PATH")]
    pub key_path: Option<String>,

    /// Root CA certificate (PEM).
    #[clap(long, env = "AWS_IOT_THING_CA_CERTIFICATE_PATH")]
    pub ca_path: Option<String>,

    /// Thing name used as client identifier.
    #[clap(long, env = "AWS_IOT_THING_NAME", default_value = "stock-publisher")]
    pub client_id: String,

    /// Topic the stock batches are published to.
    #[clap(long, env = "AWS_MQTT_SUBSCRIPTION_TOPIC", default_value = "stocks/quotes")]
    pub topic: String,

    /// Seconds to wait between two publish cycles.
    #[clap(long, env = "PUBLISH_INTERVAL_SECS", default_value_t = 100)]
    pub interval_secs: u64,

    /// Symbols per reference-data request.
    #[clap(long, env = "REFERENCE_BATCH_SIZE", default_value_t = 20)]
    pub batch_size: usize,

    /// Seconds to pause after each reference-data request.
    #[clap(long, env = "REFERENCE_BATCH_PAUSE_SECS", default_value_t = 1)]
    pub batch_pause_secs: u64,

    /// Suffix turning a ticker into its reference symbol.
    #[clap(long, env = "REFERENCE_SYMBOL_SUFFIX", default_value = ".NS")]
    pub symbol_suffix: String,

    /// Path to a text file with tickers to publish.
    /// Tickers may be separated by commas, spaces, or new lines.
    #[clap(long, env = "TICKERS_FILE")]
    pub tickers: Option<String>,

    /// Log the payloads instead of sending them.
    #[clap(long)]
    pub dry_run: bool,
}
