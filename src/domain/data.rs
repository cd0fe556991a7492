//! Dashboard payload and the fetch state that holds it

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One bar / card: a named value with its own display colour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub color: String,
}

/// Period echoed back by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub view_type: Option<String>,
    pub display_type: Option<String>,
    pub week: Option<u8>,
    pub month: Option<u8>,
    pub year: Option<i32>,
}

/// Response body of `GET /api/dashboard/data`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub personnel_data: Vec<DataPoint>,
    #[serde(default)]
    pub tech_data: Vec<DataPoint>,
    /// Processing time per technology, in minutes
    #[serde(default)]
    pub time_data: Vec<DataPoint>,
    /// Backend-defined, passed through unmodified
    #[serde(default)]
    pub summary_data: serde_json::Value,
    /// Backend-defined, passed through unmodified
    #[serde(default)]
    pub trends: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl DashboardData {
    /// True when the backend answered but has nothing to show
    pub fn is_empty(&self) -> bool {
        self.personnel_data.is_empty()
            && self.tech_data.is_empty()
            && self.time_data.is_empty()
            && is_blank(&self.summary_data)
    }
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Non-2xx HTTP response
    #[error("Erreur {status}: {status_text}")]
    Request { status: u16, status_text: String },
    /// Transport level failure (connection refused, timeout, ...)
    #[error("{0}")]
    Network(String),
    /// 2xx response whose body is not a dashboard payload
    #[error("Réponse invalide: {0}")]
    Decode(String),
}

/// Monotonic id attached to each fetch
pub type RequestToken = u64;

/// Loading flag, payload and error of the dashboard fetcher.
///
/// Only the completion of the most recently issued token is applied; older
/// completions are dropped so overlapping requests cannot overwrite newer data.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    data: Option<DashboardData>,
    loading: bool,
    error: Option<String>,
    latest_token: RequestToken,
}

impl DashboardState {
    /// Start a new request: loading on, error cleared, fresh token returned
    pub fn begin(&mut self) -> RequestToken {
        self.latest_token += 1;
        self.loading = true;
        self.error = None;
        self.latest_token
    }

    /// Apply a completion. Returns false when the token is stale and was ignored.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<DashboardData, FetchError>,
    ) -> bool {
        if token != self.latest_token {
            tracing::debug!(token, latest = self.latest_token, "dropping stale response");
            return false;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => {
                self.data = None;
                self.error = Some(err.to_string());
            }
        }
        self.loading = false;
        true
    }

    pub fn data(&self) -> Option<&DashboardData> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest_token
    }
}
