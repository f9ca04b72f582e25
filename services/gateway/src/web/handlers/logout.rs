use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, instrument, warn};

use crate::web::{session, GatewayState};

/// POST `/User/LogOut`
///
/// The backend call is best-effort: its result never gates the local
/// teardown, and logging out with no active session is not an error.
#[instrument(skip(state, headers))]
pub async fn logout(state: Extension<Arc<GatewayState>>, headers: HeaderMap) -> Response {
    let upstream_token = session::cookie_value(&headers, session::UPSTREAM_COOKIE);
    if let Err(err) = state.client.logout(upstream_token.as_deref()).await {
        warn!("Backend logout failed: {err}");
    }

    let mut response = Redirect::to("/").into_response();
    match session::clear_local_session_cookie(&state.config) {
        Ok(cookie) => {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to clear session cookie: {err}"),
    }
    match session::clear_upstream_cookie(&state.config) {
        Ok(cookie) => {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to clear upstream cookie: {err}"),
    }
    response
}
