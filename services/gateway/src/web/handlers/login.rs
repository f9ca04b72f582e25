use std::sync::Arc;

use axum::{
    extract::{Extension, Form},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, error, instrument};

use super::{failure_response, INVALID_LOGIN_MESSAGE};
use crate::web::{
    forms::{FormError, LoginForm},
    session, views, GatewayState,
};

/// GET `/User/LogIn`
pub async fn login_form(headers: HeaderMap) -> Response {
    let flash = session::take_flash(&headers);
    let mut response = views::login_page("", &[], flash.as_deref()).into_response();
    if flash.is_some() {
        response
            .headers_mut()
            .append(SET_COOKIE, session::clear_flash_cookie());
    }
    response
}

/// POST `/User/LogIn`
///
/// Local validation failures re-render without a network call. A backend 400
/// becomes the fixed field-less message; the backend's specific reason is
/// intentionally not echoed.
#[instrument(skip(state))]
pub async fn login(state: Extension<Arc<GatewayState>>, Form(form): Form<LoginForm>) -> Response {
    let errors = form.validate();
    if !errors.is_empty() {
        debug!("login form invalid: {:?}", form);
        return views::login_page(&form.email, &errors, None).into_response();
    }

    match state
        .client
        .login(form.email.trim(), &form.password, form.remember())
        .await
    {
        Ok(reply) if reply.status.is_success() => {
            establish_local_session(&state, reply.session_token.as_deref(), form.remember())
        }
        Ok(reply) if reply.status == StatusCode::BAD_REQUEST => {
            let errors = vec![FormError::form_level(INVALID_LOGIN_MESSAGE)];
            views::login_page(&form.email, &errors, None).into_response()
        }
        Ok(reply) => {
            error!("Unexpected status from backend login: {}", reply.status);
            failure_response()
        }
        Err(err) => {
            error!("Login call failed: {err}");
            failure_response()
        }
    }
}

fn establish_local_session(
    state: &GatewayState,
    upstream_token: Option<&str>,
    remember: bool,
) -> Response {
    let token = match session::generate_session_token() {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to generate session token: {err:?}");
            return failure_response();
        }
    };

    let mut response = Redirect::to("/").into_response();
    match session::local_session_cookie(&state.config, &token, remember) {
        Ok(cookie) => {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return failure_response();
        }
    }

    // Keep the backend's own session token around so logout can present it.
    if let Some(upstream_token) = upstream_token {
        if let Ok(cookie) = session::upstream_cookie(&state.config, upstream_token) {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }

    response
}
