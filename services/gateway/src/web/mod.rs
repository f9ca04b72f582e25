//! Browser-facing surface of the gateway.

use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

use crate::backend::BackendClient;

pub mod forms;
pub mod handlers;
pub mod session;
pub mod views;

const DEFAULT_REMEMBERED_TTL_SECONDS: i64 = 14 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    remembered_session_ttl_seconds: i64,
    cookie_secure: bool,
}

impl GatewayConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            remembered_session_ttl_seconds: DEFAULT_REMEMBERED_TTL_SECONDS,
            cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_remembered_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.remembered_session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn remembered_session_ttl_seconds(&self) -> i64 {
        self.remembered_session_ttl_seconds
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub struct GatewayState {
    pub client: BackendClient,
    pub config: GatewayConfig,
}

/// Build the gateway router. Kept separate from [`new`] so tests can drive
/// the full surface without binding a socket.
#[must_use]
pub fn app(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/User/LogIn",
            get(handlers::login_form).post(handlers::login),
        )
        .route(
            "/User/Register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/User/LogOut", post(handlers::logout))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, state: Arc<GatewayState>) -> Result<()> {
    let app = app(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
