use std::time::Duration;

use thiserror::Error;

/// Generic user-facing text for failures that carry no server message.
pub const GENERIC_SUBMIT_MESSAGE: &str = "Failed to get prediction. Please try again.";
pub const SCHEMA_LOAD_MESSAGE: &str = "Failed to load application data. Please refresh the page.";
pub const NO_SESSION_MESSAGE: &str = "No session found. Make a prediction first.";
pub const NO_HISTORY_MESSAGE: &str = "No prediction history found.";
pub const HISTORY_FAILED_MESSAGE: &str = "Failed to load history. Please try again.";

/// Failure talking to the scoring service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "service responded with status {status}: {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    Status {
        status: u16,
        /// The `error` field of the response body, when there was one.
        message: Option<String>,
    },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message the service itself put in the response body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("stored session id under '{key}' is malformed: {value:?}")]
    MalformedSession { key: String, value: String },
}

/// The feature schema could not be loaded. Fatal for the session.
#[derive(Debug, Error)]
#[error("feature schema load failed: {0}")]
pub struct SchemaLoadError(#[from] pub ApiError);

impl SchemaLoadError {
    pub fn user_message(&self) -> &'static str {
        SCHEMA_LOAD_MESSAGE
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The service refused the record and said why.
    #[error("prediction rejected: {0}")]
    Rejected(String),

    #[error("prediction timed out after {0:?}")]
    Timeout(Duration),

    #[error("prediction failed: {0}")]
    Failed(ApiError),

    #[error("session identity unavailable: {0}")]
    Session(#[from] StoreError),
}

impl SubmitError {
    /// Text shown to the user: the server's own message for rejections,
    /// a generic retry prompt for everything else.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::Timeout(_) => {
                "The scoring service did not respond in time. Please try again.".to_string()
            }
            Self::Failed(_) | Self::Session(_) => GENERIC_SUBMIT_MESSAGE.to_string(),
        }
    }
}

impl From<ApiError> for SubmitError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status {
                message: Some(message),
                ..
            } => SubmitError::Rejected(message),
            ApiError::Timeout(limit) => SubmitError::Timeout(limit),
            other => SubmitError::Failed(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    /// No identity has been persisted yet, so there is nothing to look up.
    #[error("no session identity has been created yet")]
    NoSession,

    #[error("the service has no history for this session")]
    NoHistory,

    #[error("history request failed: {0}")]
    Failed(ApiError),

    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error writing export: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HistoryError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoSession => NO_SESSION_MESSAGE,
            Self::NoHistory => NO_HISTORY_MESSAGE,
            _ => HISTORY_FAILED_MESSAGE,
        }
    }
}

impl From<ApiError> for HistoryError {
    fn from(e: ApiError) -> Self {
        if e.is_not_found() {
            HistoryError::NoHistory
        } else {
            HistoryError::Failed(e)
        }
    }
}
