//! AWS IoT Core publish over HTTPS.
//!
//! IoT Core accepts `POST https://<endpoint>:8443/topics/<topic>?qos=<0|1>`
//! authenticated with the thing's X.509 certificate (mutual TLS). `connect`
//! loads the certificate, private key and root CA, builds the client and makes
//! one request to the endpoint so that DNS, TLS and certificate failures
//! surface at connect time. Any HTTP status counts as reachable.
//! `disconnect` drops the client. QoS 2 does not exist on this transport.

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::{Certificate, Identity, Url, header};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use stock_common::{FeedError, Result};

use super::{QoS, TelemetrySink};

/// Port of the IoT Core HTTPS data plane.
pub const HTTPS_PORT: u16 = 8443;

/// Connection settings of an IoT thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpsSettings {
    /// Account-specific data endpoint, e.g. `xxxx-ats.iot.ap-south-1.amazonaws.com`.
    pub endpoint: String,
    /// Device certificate (PEM).
    pub cert_path: PathBuf,
    /// Device private key (PEM).
    pub key_path: PathBuf,
    /// Root CA used to verify the endpoint (PEM).
    pub ca_path: PathBuf,
    /// Thing name, logged to identify the publisher.
    pub client_id: String,
    /// Limit for establishing the TLS connection.
    pub connect_timeout: Duration,
    /// Limit for a single publish request.
    pub operation_timeout: Duration,
}

/// Telemetry sink publishing through the IoT Core HTTPS endpoint.
pub struct HttpsSink {
    settings: HttpsSettings,
    client: Option<Client>,
}

impl HttpsSink {
    /// Create a disconnected sink.
    pub fn new(settings: HttpsSettings) -> Self {
        Self {
            settings,
            client: None,
        }
    }

    fn endpoint_url(&self) -> Result<Url> {
        let base = format!("https://{}:{}/", self.settings.endpoint, HTTPS_PORT);
        Url::parse(&base).map_err(|e| FeedError::Config(format!("endpoint {}: {}", base, e)))
    }

    fn topic_url(&self, topic: &str, qos: QoS) -> Result<Url> {
        let mut url = self.endpoint_url()?;
        let base = url.to_string();
        url.path_segments_mut()
            .map_err(|_| FeedError::Config(format!("endpoint {} cannot be a base", base)))?
            .pop_if_empty()
            .push("topics")
            .extend(topic.split('/'));
        url.query_pairs_mut()
            .append_pair("qos", &qos.level().to_string());
        Ok(url)
    }

    fn build_client(&self) -> Result<Client> {
        let mut identity_pem = read_pem(&self.settings.cert_path)?;
        identity_pem.push(b'\n');
        identity_pem.extend(read_pem(&self.settings.key_path)?);
        let identity = Identity::from_pem(&identity_pem)
            .map_err(|e| FeedError::Config(format!("device certificate/key: {}", e)))?;
        let root_ca = Certificate::from_pem(&read_pem(&self.settings.ca_path)?)
            .map_err(|e| FeedError::Config(format!("root CA: {}", e)))?;

        Ok(Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .add_root_certificate(root_ca)
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.operation_timeout)
            .build()?)
    }
}

fn read_pem(path: &PathBuf) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| FeedError::Config(format!("cannot read {}: {}", path.display(), e)))
}

impl TelemetrySink for HttpsSink {
    fn connect(&mut self) -> Result<()> {
        info!(
            "Connecting to AWS IoT Core at {} as {}...",
            self.settings.endpoint, self.settings.client_id
        );
        let url = self.endpoint_url()?;
        let client = self.build_client()?;
        let response = client.get(url.clone()).send().map_err(|e| {
            FeedError::Sink(format!("cannot reach {}: {}", url, e))
        })?;
        debug!("{} answered HTTP {}", url, response.status().as_u16());
        self.client = Some(client);
        info!("Connected to AWS IoT Core");
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &str, qos: QoS) -> Result<()> {
        if qos == QoS::ExactlyOnce {
            return Err(FeedError::Sink(
                "QoS 2 is not supported by the HTTPS transport".to_string(),
            ));
        }
        let url = self.topic_url(topic, qos)?;
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FeedError::Sink("publish before connect".to_string()))?;

        let response = client
            .post(url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(FeedError::Sink(format!(
                "{} rejected publish with HTTP {}: {}",
                url,
                status.as_u16(),
                detail.trim()
            )));
        }
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if self.client.take().is_some() {
            info!("Disconnected from AWS IoT Core");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn settings(dir: &std::path::Path) -> HttpsSettings {
        HttpsSettings {
            endpoint: "abc123-ats.iot.ap-south-1.amazonaws.com".to_string(),
            cert_path: dir.join("device.pem.crt"),
            key_path: dir.join("private.pem.key"),
            ca_path: dir.join("AmazonRootCA1.pem"),
            client_id: "stock-publisher".to_string(),
            connect_timeout: Duration::from_secs(10),
            operation_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn topic_url_keeps_topic_levels() {
        let dir = tempfile::tempdir().unwrap();
        let sink = HttpsSink::new(settings(dir.path()));
        let url = sink.topic_url("market/nse quotes", QoS::AtLeastOnce).unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc123-ats.iot.ap-south-1.amazonaws.com:8443/topics/market/nse%20quotes?qos=1"
        );
    }

    #[test]
    fn missing_credentials_fail_connect() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = HttpsSink::new(settings(dir.path()));
        let err = sink.connect().unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));
        assert!(err.to_string().contains("device.pem.crt"));
    }

    #[test]
    fn malformed_certificate_fails_connect() {
        let dir = tempfile::tempdir().unwrap();
        let config = settings(dir.path());
        for path in [&config.cert_path, &config.key_path, &config.ca_path] {
            let mut file = fs::File::create(path).unwrap();
            writeln!(file, "not a pem file").unwrap();
        }
        let mut sink = HttpsSink::new(config);
        assert!(sink.connect().is_err());
        assert!(sink.client.is_none());
    }

    fn fixture_settings(endpoint: &str) -> HttpsSettings {
        let testdata = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata");
        HttpsSettings {
            endpoint: endpoint.to_string(),
            cert_path: testdata.join("device.pem.crt"),
            key_path: testdata.join("private.pem.key"),
            ca_path: testdata.join("root-ca.pem"),
            client_id: "stock-publisher".to_string(),
            connect_timeout: Duration::from_secs(2),
            operation_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn valid_credentials_build_a_client() {
        let sink = HttpsSink::new(fixture_settings("no-such-endpoint.invalid"));
        assert!(sink.build_client().is_ok());
    }

    #[test]
    fn unreachable_endpoint_fails_connect() {
        let mut sink = HttpsSink::new(fixture_settings("no-such-endpoint.invalid"));
        let err = sink.connect().unwrap_err();
        assert!(matches!(err, FeedError::Sink(_)));
        assert!(err.to_string().contains("no-such-endpoint.invalid"));
        assert!(sink.client.is_none());

        let publish = sink.publish("stocks/quotes", "{}", QoS::AtLeastOnce);
        assert!(publish.unwrap_err().to_string().contains("before connect"));
    }

    #[test]
    fn publish_requires_connection() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = HttpsSink::new(settings(dir.path()));
        let err = sink
            .publish("stocks/quotes", "{}", QoS::AtLeastOnce)
            .unwrap_err();
        assert!(matches!(err, FeedError::Sink(_)));
    }

    #[test]
    fn exactly_once_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = HttpsSink::new(settings(dir.path()));
        let err = sink
            .publish("stocks/quotes", "{}", QoS::ExactlyOnce)
            .unwrap_err();
        assert!(err.to_string().contains("QoS 2"));
    }

    #[test]
    fn disconnect_without_connect_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = HttpsSink::new(settings(dir.path()));
        sink.disconnect().unwrap();
    }
}
