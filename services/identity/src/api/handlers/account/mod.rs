//! Account endpoints: the protocol adapter over [`AuthSessionManager`].
//!
//! Handlers only decode the request, invoke the matching manager operation,
//! and serialize the result; no business logic lives here.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, instrument};

use crate::{
    core::Credential,
    session::{AuthConfig, AuthSessionManager, BackendResponse, ErrorEnvelope, SessionDirective},
};

pub mod types;

use types::{LoginRequest, RegisterRequest};

pub const SESSION_COOKIE_NAME: &str = "identity_session";

#[utoipa::path(
    post,
    path = "/Account/Register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration successful"),
        (status = 400, description = "Validation failure", body = ErrorEnvelope),
        (status = 500, description = "Store or hashing failure", body = ErrorEnvelope),
    ),
    tag = "account"
)]
#[instrument(skip(manager))]
pub async fn register(
    manager: Extension<Arc<AuthSessionManager>>,
    payload: Option<Json<RegisterRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return missing_payload();
    };
    debug!("register: {:?}", request);

    let RegisterRequest {
        identifier,
        secret,
        confirm_secret,
    } = request;
    let response = manager
        .handle_register(Credential { identifier, secret }, &confirm_secret)
        .await;
    respond(response, manager.config())
}

#[utoipa::path(
    post,
    path = "/Account/Login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set"),
        (status = 400, description = "Invalid login attempt", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
    tag = "account"
)]
#[instrument(skip(manager))]
pub async fn login(
    manager: Extension<Arc<AuthSessionManager>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return missing_payload();
    };
    debug!("login: {:?}", request);

    // remember-me semantics belong to the gateway's own session; the field is
    // accepted here for wire compatibility only.
    let LoginRequest {
        identifier,
        secret,
        remember_me: _,
    } = request;
    let response = manager.handle_login(Credential { identifier, secret }).await;
    respond(response, manager.config())
}

#[utoipa::path(
    post,
    path = "/Account/LogOut",
    responses(
        (status = 200, description = "Session revoked and cookie cleared"),
    ),
    tag = "account"
)]
#[instrument(skip(manager, headers))]
pub async fn logout(
    manager: Extension<Arc<AuthSessionManager>>,
    headers: HeaderMap,
) -> Response {
    let token = extract_session_token(&headers);
    let response = manager.handle_logout(token.as_deref()).await;
    respond(response, manager.config())
}

fn missing_payload() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorEnvelope::form_level("Missing payload.")),
    )
        .into_response()
}

fn respond(response: BackendResponse, config: &AuthConfig) -> Response {
    let mut headers = HeaderMap::new();
    match response.session {
        SessionDirective::Unchanged => {}
        SessionDirective::Establish { token } => match session_cookie(config, &token) {
            Ok(cookie) => {
                headers.insert(SET_COOKIE, cookie);
            }
            Err(err) => {
                error!("Failed to build session cookie: {err}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorEnvelope::form_level(
                        crate::session::GENERIC_FAILURE_MESSAGE,
                    )),
                )
                    .into_response();
            }
        },
        SessionDirective::Clear => {
            if let Ok(cookie) = clear_session_cookie(config) {
                headers.insert(SET_COOKIE, cookie);
            }
        }
    }

    match response.errors {
        Some(envelope) => (response.status, headers, Json(envelope)).into_response(),
        None => (response.status, headers).into_response(),
    }
}

/// Build a secure `HttpOnly` cookie for the session token.
fn session_cookie(config: &AuthConfig, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}
