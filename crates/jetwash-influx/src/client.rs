//! Blocking client for the InfluxDB 2.x HTTP API.

use chrono::Duration;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::line_protocol::Point;
use crate::response::{decode_query_response, RawSample};

/// Connection settings for one InfluxDB instance.
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub url: String,
    pub org: String,
    pub bucket: String,
    pub token: String,
}

/// Read and write access to a remote time-series store.
pub trait SeriesStore {
    /// Fetch every sample of `measurement` within the trailing `lookback`
    /// window, oldest first. An unknown measurement yields an empty vec.
    fn query_series(&self, measurement: &str, lookback: Duration) -> Result<Vec<RawSample>>;

    /// Write a single point, blocking until the store acknowledges it.
    fn write_point(&self, point: &Point) -> Result<()>;
}

/// Build the Flux query for one measurement over a trailing window.
pub fn flux_query(bucket: &str, measurement: &str, lookback: Duration) -> String {
    format!(
        "from(bucket: \"{bucket}\") \
         |> range(start: -{seconds}s) \
         |> filter(fn: (r) => r[\"_measurement\"] == \"{measurement}\") \
         |> sort(columns: [\"_time\"])",
        bucket = escape_flux_string(bucket),
        seconds = lookback.num_seconds(),
        measurement = escape_flux_string(measurement),
    )
}

fn escape_flux_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

pub struct InfluxClient {
    http: Client,
    base_url: String,
    config: InfluxConfig,
}

impl InfluxClient {
    /// Build a client for one store. Requests carry no deadline: a slow or
    /// silent store blocks the run instead of failing it, and a long window
    /// may stream for well over the blocking client's default 30 s cutoff.
    pub fn new(config: InfluxConfig) -> Result<Self> {
        let base_url = config.url.trim_end_matches('/').to_string();
        let http = Client::builder().timeout(None).build()?;
        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// Check that the instance is reachable and answering.
    pub fn ping(&self) -> Result<()> {
        let response = self.http.get(format!("{}/ping", self.base_url)).send()?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response))
        }
    }
}

impl SeriesStore for InfluxClient {
    fn query_series(&self, measurement: &str, lookback: Duration) -> Result<Vec<RawSample>> {
        let flux = flux_query(&self.config.bucket, measurement, lookback);
        debug!(measurement, "querying series");

        let response = self
            .http
            .post(format!("{}/api/v2/query", self.base_url))
            .query(&[("org", self.config.org.as_str())])
            .header("Authorization", format!("Token {}", self.config.token))
            .header("Content-Type", "application/vnd.flux")
            .header("Accept", "application/csv")
            .body(flux)
            .send()?;

        if !response.status().is_success() {
            return Err(api_error(response));
        }

        decode_query_response(&response.text()?)
    }

    fn write_point(&self, point: &Point) -> Result<()> {
        let line = point.to_line_protocol();
        debug!(measurement = point.measurement(), "writing point");

        let response = self
            .http
            .post(format!("{}/api/v2/write", self.base_url))
            .query(&[
                ("org", self.config.org.as_str()),
                ("bucket", self.config.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header("Authorization", format!("Token {}", self.config.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(line)
            .send()?;

        if !response.status().is_success() {
            return Err(api_error(response));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Map a non-2xx response to [`ClientError::Api`], pulling the message out
/// of the JSON error body when there is one.
fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or(body);
    ClientError::Api { status, message }
}
