use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::{DATE_FORMAT, IMAGERY_DIM_DEGREES};
use crate::error::FetchError;
use crate::geo::Coordinate;
use crate::settings::Settings;

/// Result of one imagery lookup for a coordinate and date.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The upstream returned an image URL.
    Found(String),
    /// The upstream answered but had no image for the date.
    Missing { upstream_message: Option<String> },
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchOutcome::Found(url) => Some(url.as_str()),
            _ => None,
        }
    }

    /// User-facing text for a lookup that produced no image.
    pub fn notice(&self, date: NaiveDate) -> Option<String> {
        match self {
            FetchOutcome::Found(_) => None,
            FetchOutcome::Missing {
                upstream_message: Some(message),
            } => Some(format!("No NDVI data available for {date}. ({message})")),
            FetchOutcome::Missing {
                upstream_message: None,
            } => Some(format!("No NDVI data available for {date}.")),
            FetchOutcome::Failed(e) => Some(format!("Error fetching NDVI data for {date}: {e}")),
        }
    }
}

/// Anything that can look up an image reference for a coordinate and date.
#[async_trait]
pub trait ImagerySource: Send + Sync {
    async fn fetch(&self, coordinate: Coordinate, date: NaiveDate) -> FetchOutcome;
}

/// Client for the NASA Earth imagery `assets` endpoint.
#[derive(Clone)]
pub struct EarthImageryClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl EarthImageryClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_endpoint.clone(), settings.api_key.clone())
    }

    fn query(&self, coordinate: Coordinate, date: NaiveDate) -> [(&'static str, String); 5] {
        [
            ("lon", coordinate.lon().to_string()),
            ("lat", coordinate.lat().to_string()),
            ("dim", IMAGERY_DIM_DEGREES.to_string()),
            ("date", date.format(DATE_FORMAT).to_string()),
            ("api_key", self.api_key.clone()),
        ]
    }

    async fn request(&self, coordinate: Coordinate, date: NaiveDate) -> Result<String, FetchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.query(coordinate, date))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "imagery response received");
        Ok(body)
    }
}

impl std::fmt::Debug for EarthImageryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EarthImageryClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl ImagerySource for EarthImageryClient {
    async fn fetch(&self, coordinate: Coordinate, date: NaiveDate) -> FetchOutcome {
        debug!(%coordinate, %date, "fetching imagery");

        let outcome = match self.request(coordinate, date).await {
            Ok(body) => parse_assets_response(&body),
            Err(e) => FetchOutcome::Failed(e),
        };

        match &outcome {
            FetchOutcome::Found(url) => debug!(%date, %url, "imagery found"),
            FetchOutcome::Missing { upstream_message } => {
                warn!(%coordinate, %date, reason = ?upstream_message, "no imagery available")
            }
            FetchOutcome::Failed(e) => warn!(%coordinate, %date, error = %e, "imagery lookup failed"),
        }
        outcome
    }
}

/// Interprets an `assets` response body.
///
/// The HTTP status is not consulted: the upstream reports "no asset" and
/// key problems as JSON bodies, so only the presence of a string `url`
/// field decides between found and missing.
pub fn parse_assets_response(body: &str) -> FetchOutcome {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return FetchOutcome::Failed(FetchError::Parse(e)),
    };

    if let Some(url) = value.get("url").and_then(Value::as_str) {
        return FetchOutcome::Found(url.to_string());
    }

    let upstream_message = value
        .get("msg")
        .and_then(Value::as_str)
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .map(str::to_string);

    FetchOutcome::Missing { upstream_message }
}
