//! Session artifacts and the user-record seam the gate reads through.

pub mod privileges;

pub use privileges::Privileges;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// The cookie representing an authenticated session with the diary portal.
/// Expiry is the provider's business; none is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionArtifact {
    pub name: String,
    pub value: String,
}

impl SessionArtifact {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The shape `/login/sms_login` answers with: `{<cookie-name>: <value>}`.
    #[must_use]
    pub fn to_map(&self) -> serde_json::Value {
        serde_json::json!({ &self.name: &self.value })
    }
}

/// Resolves a caller identity to the session artifact persisted for it.
///
/// Stands in for the external user-record store; the gate and the login
/// handlers only ever talk to this trait.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user: &str) -> Option<SessionArtifact>;
    async fn put(&self, user: &str, artifact: SessionArtifact);
    async fn remove(&self, user: &str);
}

/// Process-local store used when no external user-record service is wired in.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<HashMap<String, SessionArtifact>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user: &str) -> Option<SessionArtifact> {
        self.inner.read().await.get(user).cloned()
    }

    async fn put(&self, user: &str, artifact: SessionArtifact) {
        self.inner.write().await.insert(user.to_string(), artifact);
    }

    async fn remove(&self, user: &str) {
        self.inner.write().await.remove(user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::default();
        assert!(store.get("alice").await.is_none());

        let artifact = SessionArtifact::new("sessionid", "opaque");
        store.put("alice", artifact.clone()).await;
        assert_eq!(store.get("alice").await, Some(artifact));

        store.remove("alice").await;
        assert!(store.get("alice").await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemorySessionStore::default();
        store.put("alice", SessionArtifact::new("sessionid", "old")).await;
        store.put("alice", SessionArtifact::new("sessionid", "new")).await;
        assert_eq!(
            store.get("alice").await.map(|artifact| artifact.value),
            Some("new".to_string())
        );
    }

    #[test]
    fn test_artifact_map_shape() {
        let artifact = SessionArtifact::new("sessionid", "xyz");
        assert_eq!(
            artifact.to_map(),
            serde_json::json!({"sessionid": "xyz"})
        );
    }
}
