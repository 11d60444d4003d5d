//! HTTP client for the Factory Guardian backend.
//!
//! `DashboardApi` is the seam the poller and store talk to. Production code
//! uses `HttpDashboardApi`; tests plug in fakes.

use async_trait::async_trait;
use guardian_common::{AckError, ApiResponse, DashboardSnapshot, FetchError, GuardianConfig};
use reqwest::{Client, RequestBuilder, Url};
use std::time::Duration;
use tracing::debug;

// ============================================================================
// API Trait
// ============================================================================

/// Operations the dashboard needs from the backend
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /api/dashboard`
    async fn fetch_dashboard(&self) -> Result<DashboardSnapshot, FetchError>;

    /// `POST /api/alerts/{id}/acknowledge`
    async fn acknowledge(&self, alert_id: &str) -> Result<(), AckError>;

    /// `GET /api/health`, status code only
    async fn health(&self) -> bool;
}

// ============================================================================
// HTTP Implementation
// ============================================================================

pub struct HttpDashboardApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    fetch_timeout: Duration,
    health_timeout: Duration,
}

impl HttpDashboardApi {
    pub fn new(config: &GuardianConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(format!("guardianctl/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: guardian_common::config::trim_base_url(&config.api_base_url),
            api_key: config.api_key.clone(),
            fetch_timeout: config.fetch_timeout(),
            health_timeout: config.health_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn dashboard_url(&self) -> String {
        format!("{}/api/dashboard", self.base_url)
    }

    /// The alert id is percent-encoded as a single path segment
    fn acknowledge_url(&self, alert_id: &str) -> Result<Url, AckError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| AckError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| AckError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", "alerts", alert_id, "acknowledge"]);
        Ok(url)
    }

    fn health_url(&self) -> String {
        format!("{}/api/health", self.base_url)
    }

    /// JSON content type plus the bearer token when configured
    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Content-Type", "application/json");
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn fetch_dashboard(&self) -> Result<DashboardSnapshot, FetchError> {
        let url = self.dashboard_url();
        debug!("GET {}", url);

        let response = self
            .with_headers(self.client.get(&url))
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(fetch_error)?;
        decode_dashboard(&body)
    }

    async fn acknowledge(&self, alert_id: &str) -> Result<(), AckError> {
        let url = self.acknowledge_url(alert_id)?;
        debug!("POST {}", url);

        let response = self
            .with_headers(self.client.post(url))
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(ack_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AckError::BadStatus(status.as_u16()))
        }
    }

    async fn health(&self) -> bool {
        self.client
            .get(self.health_url())
            .timeout(self.health_timeout)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

/// Decode a dashboard envelope and normalize the payload
pub fn decode_dashboard(body: &[u8]) -> Result<DashboardSnapshot, FetchError> {
    let envelope: ApiResponse<DashboardSnapshot> =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if !envelope.success {
        return Err(FetchError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "success flag was false".to_string()),
        ));
    }

    Ok(envelope.data.normalize())
}

fn fetch_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_decode() {
        FetchError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
        FetchError::BadStatus(status.as_u16())
    } else {
        FetchError::Network(err.to_string())
    }
}

fn ack_error(err: reqwest::Error) -> AckError {
    if err.is_timeout() {
        AckError::Timeout
    } else {
        AckError::Network(err.to_string())
    }
}
