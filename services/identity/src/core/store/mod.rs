//! Storage capabilities backing the identity core.
//!
//! The store is a black-box collaborator: the core only sees these narrow
//! traits, so tests and the default deployment run on [`MemoryStore`] while a
//! DSN switches the service to [`PgStore`] without touching the core.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A persisted user record. Created on successful registration, mutated only
/// by the identity core, never deleted here.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub identifier: String,
    pub secret_hash: String,
    pub confirmed: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Result of the atomic uniqueness check-and-insert.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    Conflict,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Atomic check-and-insert keyed on the normalized identifier. Two
    /// concurrent calls for the same identifier yield exactly one `Created`.
    async fn insert_user(
        &self,
        identifier: &str,
        secret_hash: &str,
    ) -> Result<InsertOutcome, StoreError>;

    async fn find_user(&self, identifier: &str) -> Result<Option<UserRecord>, StoreError>;
}

/// Backend session persistence. Only token hashes are stored; raw tokens
/// travel exclusively in Set-Cookie values.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(
        &self,
        identifier: &str,
        session_hash: Vec<u8>,
        ttl_seconds: i64,
    ) -> Result<(), StoreError>;

    /// Idempotent; revoking an absent session is not an error.
    async fn delete_session(&self, session_hash: &[u8]) -> Result<(), StoreError>;
}
