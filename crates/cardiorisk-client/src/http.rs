//! [`ScoringApi`] over HTTP.
//!
//! `ureq` is blocking, so every request runs on tokio's blocking pool and the
//! calling task only awaits the join handle. The agent's global timeout bounds
//! each request end to end.

use std::time::Duration;

use cardiorisk_core::form::FormRecord;
use cardiorisk_core::models::history::SessionHistory;
use cardiorisk_core::models::prediction::PredictionResult;
use cardiorisk_core::schema::FeatureSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;
use ureq::http::Response;

use crate::api::{BoxFuture, ScoringApi, ServiceHealth};
use crate::error::ApiError;
use crate::session::SessionIdentity;

/// Header carrying the session identity on prediction requests.
pub const SESSION_HEADER: &str = "X-Session-ID";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct HttpScoringClient {
    agent: Agent,
    base_url: String,
    timeout: Duration,
}

impl HttpScoringClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T>(&self, path: String) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        let url = self.url(&path);
        let timeout = self.timeout;
        run_blocking(move || {
            debug!(url = %url, "GET");
            let response = agent
                .get(url.as_str())
                .call()
                .map_err(|e| transport_error(e, timeout))?;
            read_json(response, timeout)
        })
        .await
    }
}

async fn run_blocking<T, F>(request: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(request)
        .await
        .map_err(|e| ApiError::Transport(format!("request task failed: {e}")))?
}

fn transport_error(err: ureq::Error, timeout: Duration) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => ApiError::Timeout(timeout),
        other => ApiError::Transport(other.to_string()),
    }
}

/// Decode a 2xx body as `T`; map anything else to [`ApiError::Status`].
fn read_json<T: DeserializeOwned>(
    mut response: Response<ureq::Body>,
    timeout: Duration,
) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| transport_error(e, timeout))?;

    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|b| b.error);
        debug!(status, message = ?message, "service returned an error status");
        return Err(ApiError::Status { status, message });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

impl ScoringApi for HttpScoringClient {
    fn features(&self) -> BoxFuture<'_, Result<FeatureSchema, ApiError>> {
        Box::pin(self.get("features".to_string()))
    }

    fn predict<'a>(
        &'a self,
        record: &'a FormRecord,
        session: &'a SessionIdentity,
    ) -> BoxFuture<'a, Result<PredictionResult, ApiError>> {
        Box::pin(async move {
            let agent = self.agent.clone();
            let url = self.url("predict");
            let timeout = self.timeout;
            let body = serde_json::to_value(record)?;
            let session = session.as_str().to_string();
            run_blocking(move || {
                debug!(url = %url, session_id = %session, "POST");
                let response = agent
                    .post(url.as_str())
                    .header(SESSION_HEADER, session.as_str())
                    .send_json(&body)
                    .map_err(|e| transport_error(e, timeout))?;
                read_json(response, timeout)
            })
            .await
        })
    }

    fn history<'a>(
        &'a self,
        session: &'a SessionIdentity,
    ) -> BoxFuture<'a, Result<SessionHistory, ApiError>> {
        Box::pin(self.get(format!("history/{session}")))
    }

    fn export<'a>(
        &'a self,
        session: &'a SessionIdentity,
    ) -> BoxFuture<'a, Result<serde_json::Value, ApiError>> {
        Box::pin(self.get(format!("export/{session}")))
    }

    fn health(&self) -> BoxFuture<'_, Result<ServiceHealth, ApiError>> {
        Box::pin(self.get("health".to_string()))
    }
}
