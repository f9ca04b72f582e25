//! Browser-facing handlers: each one broker-calls the backend and translates
//! the protocol result into UI state.

use axum::{
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use super::{session, views};

mod login;
mod logout;
mod register;

pub use login::{login, login_form};
pub use logout::logout;
pub use register::{register, register_form};

pub const INVALID_LOGIN_MESSAGE: &str = "Invalid login attempt.";
pub const REGISTRATION_COMPLETE_MESSAGE: &str = "Registration complete. Please log in.";

/// GET `/` - landing page; consumes a pending flash notice.
pub async fn home(headers: HeaderMap) -> Response {
    let flash = session::take_flash(&headers);
    let signed_in = session::has_local_session(&headers);
    let mut response = views::home_page(flash.as_deref(), signed_in).into_response();
    if flash.is_some() {
        response
            .headers_mut()
            .append(SET_COOKIE, session::clear_flash_cookie());
    }
    response
}

/// Transport, timeout, and protocol-contract failures all land here: a
/// generic failure state that cannot be confused with validation feedback.
pub(super) fn failure_response() -> Response {
    (StatusCode::BAD_GATEWAY, views::failure_page()).into_response()
}
