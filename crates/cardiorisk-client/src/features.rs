use std::time::Duration;

use cardiorisk_core::schema::FeatureSchema;
use tracing::{error, info};

use crate::api::{ScoringApi, with_timeout};
use crate::error::SchemaLoadError;

/// Fetch the feature schema once at startup.
///
/// There is no retry: a failure leaves the application without a form and
/// the caller is expected to surface [`SchemaLoadError::user_message`].
pub async fn load_feature_schema(
    api: &dyn ScoringApi,
    timeout: Duration,
) -> Result<FeatureSchema, SchemaLoadError> {
    match with_timeout(timeout, api.features()).await {
        Ok(schema) => {
            info!(fields = schema.len(), "feature schema loaded");
            Ok(schema)
        }
        Err(e) => {
            error!(error = %e, "failed to load feature schema");
            Err(SchemaLoadError(e))
        }
    }
}
