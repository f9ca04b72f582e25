use crate::{
    api,
    core::{IdentityCore, MemoryStore, PgStore, SessionStore, UserStore},
    session::{AuthConfig, AuthSessionManager},
};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub session_ttl_seconds: i64,
    pub secure_cookies: bool,
    pub gateway_origin: Option<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = AuthConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_session_cookie_secure(args.secure_cookies);

    let (user_store, session_store): (Arc<dyn UserStore>, Arc<dyn SessionStore>) = match &args.dsn
    {
        Some(dsn) => {
            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(5)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(dsn)
                .await
                .context("Failed to connect to database")?;
            let store = Arc::new(PgStore::new(pool));
            (store.clone(), store)
        }
        None => {
            info!("No DSN configured, using the in-memory store");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        }
    };

    let core = Arc::new(IdentityCore::new(user_store));
    let manager = Arc::new(AuthSessionManager::new(
        core.clone(),
        core,
        session_store,
        config,
    ));

    api::new(args.port, manager, args.gateway_origin.as_deref()).await
}
