use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cardiorisk_core::models::history::SessionHistory;
use tracing::{info, warn};

use crate::api::{ScoringApi, with_timeout};
use crate::error::HistoryError;
use crate::session::{SessionIdentity, SessionProvider};

/// The export payload for one session, ready to be saved as a file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub session: SessionIdentity,
    pub payload: serde_json::Value,
}

impl ExportDocument {
    pub fn file_name(&self) -> String {
        format!("heart_prediction_history_{}.json", self.session)
    }

    /// Two-space indented JSON, the payload otherwise untouched.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.payload)
    }

    /// Write the document into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, HistoryError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, self.to_pretty_json()?)?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(path)
    }
}

/// On-demand history and export for the current session. Every call goes
/// to the service; nothing is cached between calls.
pub struct HistoryAggregator {
    api: Arc<dyn ScoringApi>,
    sessions: Arc<SessionProvider>,
    timeout: Duration,
}

impl HistoryAggregator {
    pub fn new(api: Arc<dyn ScoringApi>, sessions: Arc<SessionProvider>, timeout: Duration) -> Self {
        Self {
            api,
            sessions,
            timeout,
        }
    }

    fn session(&self) -> Result<SessionIdentity, HistoryError> {
        self.sessions.current().ok_or(HistoryError::NoSession)
    }

    /// Fetch this session's predictions. Without a persisted session the
    /// service is not contacted at all.
    pub async fn load(&self) -> Result<SessionHistory, HistoryError> {
        let session = self.session()?;
        let history = with_timeout(self.timeout, self.api.history(&session)).await?;
        info!(session_id = %session, predictions = history.predictions.len(), "history loaded");
        Ok(history)
    }

    pub async fn export(&self) -> Result<ExportDocument, HistoryError> {
        let session = self.session()?;
        let payload = with_timeout(self.timeout, self.api.export(&session)).await?;
        Ok(ExportDocument { session, payload })
    }

    /// Export and save into `dir`. Failures are logged and reported as
    /// `None`; they never affect a history already on screen.
    pub async fn export_to_dir(&self, dir: &Path) -> Option<PathBuf> {
        let saved = match self.export().await {
            Ok(document) => document.write_to(dir),
            Err(e) => Err(e),
        };
        match saved {
            Ok(path) => {
                info!(path = %path.display(), "history exported");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                None
            }
        }
    }
}
