//! REST client for the KPI backend

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::domain::{DashboardData, DashboardQuery, FetchError, ModuleInfo};

pub const DEFAULT_API_URL: &str = "http://localhost:5001";

/// Connection settings for the backend
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    pub fn display(&self) -> String {
        self.base_url
            .trim_start_matches("http://")
            .trim_start_matches("https://")
            .to_string()
    }
}

/// Backend operations used by the dashboard
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync + 'static {
    /// `GET /api/dashboard/data` with the filter query
    async fn dashboard_data(&self, query: &DashboardQuery) -> Result<DashboardData, FetchError>;

    /// `GET /api/modules`
    async fn modules(&self) -> Result<Vec<ModuleInfo>, FetchError>;
}

/// reqwest-backed [`DashboardApi`]
#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDashboardApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.token.as_deref().filter(|t| !t.trim().is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .context("API token is not a valid header value")?;
            headers.insert(AUTHORIZATION, value);
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: normalize_base_url(&config.base_url),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .extensions()
                .get::<hyper::ext::ReasonPhrase>()
                .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned());
            return Err(request_error(status, reason));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn dashboard_data(&self, query: &DashboardQuery) -> Result<DashboardData, FetchError> {
        let request = self.http.get(self.url("/api/dashboard/data")).query(query);
        self.get_json(request).await
    }

    async fn modules(&self) -> Result<Vec<ModuleInfo>, FetchError> {
        let request = self.http.get(self.url("/api/modules"));
        let mut modules: Vec<ModuleInfo> = self.get_json(request).await?;
        modules.sort_by_key(|module| module.order.unwrap_or(999));
        Ok(modules)
    }
}

/// The phrase the server sent wins over the canonical one
fn request_error(status: reqwest::StatusCode, reason: Option<String>) -> FetchError {
    let status_text = reason
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Unknown Status".to_string());
    FetchError::Request {
        status: status.as_u16(),
        status_text,
    }
}

/// Adds a scheme when missing and drops trailing slashes
pub fn normalize_base_url(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}
