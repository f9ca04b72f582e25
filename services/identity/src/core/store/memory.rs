//! In-memory store, used when no DSN is configured and throughout the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{InsertOutcome, SessionStore, StoreError, UserRecord, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    sessions: RwLock<HashMap<Vec<u8>, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub(crate) async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(
        &self,
        identifier: &str,
        secret_hash: &str,
    ) -> Result<InsertOutcome, StoreError> {
        // The single write guard makes the check-and-insert atomic.
        let mut users = self.users.write().await;
        if users.contains_key(identifier) {
            return Ok(InsertOutcome::Conflict);
        }
        users.insert(
            identifier.to_string(),
            UserRecord {
                identifier: identifier.to_string(),
                secret_hash: secret_hash.to_string(),
                confirmed: true,
            },
        );
        Ok(InsertOutcome::Created)
    }

    async fn find_user(&self, identifier: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(identifier).cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(
        &self,
        identifier: &str,
        session_hash: Vec<u8>,
        _ttl_seconds: i64,
    ) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session_hash, identifier.to_string());
        Ok(())
    }

    async fn delete_session(&self, session_hash: &[u8]) -> Result<(), StoreError> {
        self.sessions.write().await.remove(session_hash);
        Ok(())
    }
}
