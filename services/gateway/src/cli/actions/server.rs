use crate::{
    backend::BackendClient,
    web::{self, GatewayConfig, GatewayState},
};
use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub backend_url: Url,
    pub backend_timeout_seconds: u64,
    pub session_ttl_seconds: i64,
    pub secure_cookies: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the server fails
/// to start.
pub async fn execute(args: Args) -> Result<()> {
    let client = BackendClient::new(
        args.backend_url,
        Duration::from_secs(args.backend_timeout_seconds),
    )
    .context("Failed to build the backend client")?;

    let config = GatewayConfig::new()
        .with_remembered_session_ttl_seconds(args.session_ttl_seconds)
        .with_cookie_secure(args.secure_cookies);

    let state = Arc::new(GatewayState { client, config });

    web::new(args.port, state).await
}
