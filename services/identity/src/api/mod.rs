//! HTTP surface of the identity service.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;

use crate::{
    api::handlers::account::types::{LoginRequest, RegisterRequest},
    api::handlers::{
        account::{__path_login, __path_logout, __path_register},
        health::__path_health,
    },
    core::FieldMessage,
    session::{AuthSessionManager, ErrorEnvelope},
};

pub mod handlers;

#[derive(OpenApi)]
#[openapi(
    paths(health, register, login, logout),
    components(schemas(RegisterRequest, LoginRequest, ErrorEnvelope, FieldMessage)),
    tags(
        (name = "account", description = "Register/login/logout handoff operations"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the service router. Kept separate from [`new`] so tests can drive
/// the full surface without binding a socket.
pub fn app(manager: Arc<AuthSessionManager>, gateway_origin: Option<&str>) -> Result<Router> {
    let cors = match gateway_origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .with_context(|| format!("invalid gateway origin: {origin}"))?;
            CorsLayer::new()
                .allow_headers([CONTENT_TYPE])
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(AllowOrigin::exact(origin))
                .allow_credentials(true)
        }
        None => CorsLayer::new()
            .allow_headers([CONTENT_TYPE])
            .allow_methods([Method::GET, Method::POST])
            .allow_origin(Any),
    };

    let app = Router::new()
        .route("/Account/Register", post(handlers::register))
        .route("/Account/Login", post(handlers::login))
        .route("/Account/LogOut", post(handlers::logout))
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
                .layer(cors)
                .layer(Extension(manager)),
        )
        .route("/health", get(handlers::health).options(handlers::health));

    Ok(app)
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    manager: Arc<AuthSessionManager>,
    gateway_origin: Option<&str>,
) -> Result<()> {
    let app = app(manager, gateway_origin)?;

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
