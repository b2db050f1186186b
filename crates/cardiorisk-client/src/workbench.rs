//! The four client components wired together.
//!
//! Startup loads the schema before any form exists. Submission moves the form
//! through its busy state; history and export only share the session provider
//! and stay usable through [`Workbench::history_handle`] while a submission is
//! in flight.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cardiorisk_core::error::FormError;
use cardiorisk_core::form::FormEngine;
use cardiorisk_core::models::history::SessionHistory;
use cardiorisk_core::models::prediction::PredictionResult;
use thiserror::Error;

use crate::api::ScoringApi;
use crate::error::{HistoryError, SchemaLoadError, SubmitError};
use crate::features::load_feature_schema;
use crate::history::HistoryAggregator;
use crate::session::SessionProvider;
use crate::submission::SubmissionManager;

/// Why a submit attempt produced no result.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Stopped locally; nothing was sent.
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

pub struct Workbench {
    form: FormEngine,
    submissions: SubmissionManager,
    history: Arc<HistoryAggregator>,
}

impl Workbench {
    /// Load the feature schema and build an empty form from it.
    pub async fn start(
        api: Arc<dyn ScoringApi>,
        sessions: Arc<SessionProvider>,
        timeout: Duration,
    ) -> Result<Self, SchemaLoadError> {
        let schema = load_feature_schema(api.as_ref(), timeout).await?;

        Ok(Self {
            form: FormEngine::new(Arc::new(schema)),
            submissions: SubmissionManager::new(api.clone(), sessions.clone(), timeout),
            history: Arc::new(HistoryAggregator::new(api, sessions, timeout)),
        })
    }

    pub fn form(&self) -> &FormEngine {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormEngine {
        &mut self.form
    }

    /// Shared handle on the history component. It does not borrow the
    /// workbench, so it can load or export while [`Workbench::submit`] runs.
    pub fn history_handle(&self) -> Arc<HistoryAggregator> {
        self.history.clone()
    }

    /// Validate and, if clean, submit the current record. The form's busy
    /// state covers the whole network call and always ends with either a
    /// stored result or a stored failure message.
    pub async fn submit(&mut self) -> Result<PredictionResult, AttemptError> {
        let record = self.form.begin_submit()?;

        match self.submissions.submit(&record).await {
            Ok(result) => {
                self.form.complete(result.clone());
                Ok(result)
            }
            Err(e) => {
                self.form.fail(e.user_message());
                Err(e.into())
            }
        }
    }

    pub fn reset(&mut self) -> Result<(), FormError> {
        self.form.reset()
    }

    pub async fn load_history(&self) -> Result<SessionHistory, HistoryError> {
        self.history.load().await
    }

    pub async fn export_to_dir(&self, dir: &Path) -> Option<PathBuf> {
        self.history.export_to_dir(dir).await
    }
}
