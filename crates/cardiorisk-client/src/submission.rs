use std::sync::Arc;
use std::time::Duration;

use cardiorisk_core::form::FormRecord;
use cardiorisk_core::models::prediction::PredictionResult;
use tracing::{info, warn};

use crate::api::{ScoringApi, with_timeout};
use crate::error::SubmitError;
use crate::session::SessionProvider;

/// Sends validated records to the prediction endpoint under this profile's
/// session identity. No retries; a failed submission is resubmitted by the user.
pub struct SubmissionManager {
    api: Arc<dyn ScoringApi>,
    sessions: Arc<SessionProvider>,
    timeout: Duration,
}

impl SubmissionManager {
    pub fn new(api: Arc<dyn ScoringApi>, sessions: Arc<SessionProvider>, timeout: Duration) -> Self {
        Self {
            api,
            sessions,
            timeout,
        }
    }

    /// Submit `record`. The session identity is created here on first use.
    pub async fn submit(&self, record: &FormRecord) -> Result<PredictionResult, SubmitError> {
        let session = self.sessions.resolve_or_create()?;

        match with_timeout(self.timeout, self.api.predict(record, &session)).await {
            Ok(result) => {
                info!(
                    session_id = %session,
                    prediction_id = ?result.prediction_id,
                    risk_level = %result.risk_level,
                    "prediction completed"
                );
                Ok(result)
            }
            Err(e) => {
                let err = SubmitError::from(e);
                warn!(session_id = %session, error = %err, "prediction failed");
                Err(err)
            }
        }
    }
}
