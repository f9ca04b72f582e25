use std::sync::Arc;

use axum::{
    extract::{Extension, Form},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, error, instrument};

use super::{failure_response, REGISTRATION_COMPLETE_MESSAGE};
use crate::web::{
    forms::{FormError, RegisterForm},
    session, views, GatewayState,
};

/// GET `/User/Register`
pub async fn register_form() -> Response {
    views::register_page("", &[]).into_response()
}

/// POST `/User/Register`
///
/// On a backend 400 the first envelope message is attached to the form. An
/// unreadable envelope is a contract violation and surfaces as a system
/// failure, never as a silently blank error.
#[instrument(skip(state))]
pub async fn register(
    state: Extension<Arc<GatewayState>>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let errors = form.validate();
    if !errors.is_empty() {
        debug!("register form invalid: {:?}", form);
        return views::register_page(&form.email, &errors).into_response();
    }

    match state
        .client
        .register(form.email.trim(), &form.password, &form.confirm_password)
        .await
    {
        Ok(reply) if reply.status.is_success() => {
            let mut response = Redirect::to("/User/LogIn").into_response();
            match session::flash_cookie(REGISTRATION_COMPLETE_MESSAGE) {
                Ok(cookie) => {
                    response.headers_mut().append(SET_COOKIE, cookie);
                }
                Err(err) => {
                    error!("Failed to build flash cookie: {err}");
                }
            }
            response
        }
        Ok(reply) if reply.status == StatusCode::BAD_REQUEST => {
            match reply.errors.as_ref().and_then(|envelope| envelope.first_message()) {
                Some(message) => {
                    let errors = vec![FormError::form_level(message)];
                    views::register_page(&form.email, &errors).into_response()
                }
                None => {
                    error!("Backend validation failure without a readable envelope");
                    failure_response()
                }
            }
        }
        Ok(reply) => {
            error!("Unexpected status from backend register: {}", reply.status);
            failure_response()
        }
        Err(err) => {
            error!("Register call failed: {err}");
            failure_response()
        }
    }
}
