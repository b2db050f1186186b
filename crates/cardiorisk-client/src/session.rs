//! Per-profile session identity.
//!
//! The identity is an opaque correlation token, not a credential. It is
//! created lazily on the first submission and never changes afterwards
//! unless the backing store is cleared.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;
use crate::store::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionIdentity(String);

impl SessionIdentity {
    /// `session_<unix millis>_<9 random base-16 chars>`.
    pub fn generate() -> Self {
        let millis = jiff::Timestamp::now().as_millisecond();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("session_{millis}_{}", &suffix[..9]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ids travel as a URL path segment, so only `[A-Za-z0-9_-]` is accepted.
    pub fn is_well_formed(raw: &str) -> bool {
        !raw.is_empty()
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Resolves the session identity from a [`KeyValueStore`] under an
/// injected key. Construct one per application and share it.
pub struct SessionProvider {
    store: Arc<dyn KeyValueStore>,
    key: String,
    resolved: Mutex<Option<SessionIdentity>>,
}

impl SessionProvider {
    /// Read any persisted identity. Nothing is created here.
    pub fn open(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        let resolved = read_identity(store.as_ref(), &key)?;
        Ok(Self {
            store,
            key,
            resolved: Mutex::new(resolved),
        })
    }

    /// The persisted identity, if one exists. Never creates one.
    pub fn current(&self) -> Option<SessionIdentity> {
        self.resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the persisted identity, creating and persisting a new one
    /// first if none exists. Repeated calls return the same token.
    pub fn resolve_or_create(&self) -> Result<SessionIdentity, StoreError> {
        let mut resolved = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(identity) = resolved.as_ref() {
            return Ok(identity.clone());
        }

        // Another provider on the same store may have written one since open().
        if let Some(identity) = read_identity(self.store.as_ref(), &self.key)? {
            *resolved = Some(identity.clone());
            return Ok(identity);
        }

        let identity = SessionIdentity::generate();
        self.store.set(&self.key, identity.as_str())?;
        info!(session_id = %identity, key = %self.key, "created session identity");
        *resolved = Some(identity.clone());
        Ok(identity)
    }
}

/// An empty value counts as absent; anything else must be a well-formed id.
fn read_identity(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<SessionIdentity>, StoreError> {
    match store.get(key)? {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) if SessionIdentity::is_well_formed(&value) => Ok(Some(SessionIdentity(value))),
        Some(value) => Err(StoreError::MalformedSession {
            key: key.to_string(),
            value,
        }),
    }
}
