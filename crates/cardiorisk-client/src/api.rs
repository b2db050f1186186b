use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use cardiorisk_core::form::FormRecord;
use cardiorisk_core::models::history::SessionHistory;
use cardiorisk_core::models::prediction::PredictionResult;
use cardiorisk_core::schema::FeatureSchema;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::session::SessionIdentity;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub scaler_loaded: bool,
}

impl ServiceHealth {
    pub fn is_ready(&self) -> bool {
        self.model_loaded && self.scaler_loaded
    }
}

/// The remote scoring service.
///
/// Methods return boxed futures for dyn compatibility. Implementations
/// report non-2xx responses as [`ApiError::Status`] carrying the body's
/// `error` message when present.
pub trait ScoringApi: Send + Sync {
    /// `GET /features`
    fn features(&self) -> BoxFuture<'_, Result<FeatureSchema, ApiError>>;

    /// `POST /predict` with the session as the `X-Session-ID` correlation header.
    fn predict<'a>(
        &'a self,
        record: &'a FormRecord,
        session: &'a SessionIdentity,
    ) -> BoxFuture<'a, Result<PredictionResult, ApiError>>;

    /// `GET /history/{session_id}`
    fn history<'a>(
        &'a self,
        session: &'a SessionIdentity,
    ) -> BoxFuture<'a, Result<SessionHistory, ApiError>>;

    /// `GET /export/{session_id}`; the document is opaque to the client.
    fn export<'a>(
        &'a self,
        session: &'a SessionIdentity,
    ) -> BoxFuture<'a, Result<serde_json::Value, ApiError>>;

    /// `GET /health`
    fn health(&self) -> BoxFuture<'_, Result<ServiceHealth, ApiError>>;
}

/// Bound a service call by `limit`, surfacing expiry as [`ApiError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| ApiError::Timeout(limit))?
}
