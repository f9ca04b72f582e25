//! Postgres-backed store. Reference schema lives in `db/sql/01_identity.sql`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::{InsertOutcome, SessionStore, StoreError, UserRecord, UserStore};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(
        &self,
        identifier: &str,
        secret_hash: &str,
    ) -> Result<InsertOutcome, StoreError> {
        // Uniqueness is enforced by the identifier index; the insert either
        // lands whole or not at all, so a failed register leaves no partial row.
        let query = r"
            INSERT INTO users (identifier, secret_hash, confirmed)
            VALUES ($1, $2, TRUE)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(identifier)
            .bind(secret_hash)
            .execute(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Created),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Conflict),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_user(&self, identifier: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = r"
            SELECT identifier, secret_hash, confirmed
            FROM users
            WHERE identifier = $1
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.map(|row| UserRecord {
            identifier: row.get("identifier"),
            secret_hash: row.get("secret_hash"),
            confirmed: row.get("confirmed"),
        }))
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert_session(
        &self,
        identifier: &str,
        session_hash: Vec<u8>,
        ttl_seconds: i64,
    ) -> Result<(), StoreError> {
        let query = r"
            INSERT INTO user_sessions (session_hash, identifier, expires_at)
            VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(session_hash)
            .bind(identifier)
            .bind(ttl_seconds)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(())
    }

    async fn delete_session(&self, session_hash: &[u8]) -> Result<(), StoreError> {
        // Logout is idempotent; it's fine if no rows are deleted.
        let query = "DELETE FROM user_sessions WHERE session_hash = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(session_hash)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(())
    }
}
