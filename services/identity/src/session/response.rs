//! Protocol-level response types for account operations.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::FieldMessage;

/// Wire version of the error envelope. Bump when the shape changes.
pub const ENVELOPE_VERSION: u16 = 1;

pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Structured validation-error body attached to every non-success response.
///
/// `errors` is ordered and never empty on the wire; form-level entries use an
/// empty `field`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub version: u16,
    pub errors: Vec<FieldMessage>,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(errors: Vec<FieldMessage>) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            errors,
        }
    }

    #[must_use]
    pub fn form_level(message: impl Into<String>) -> Self {
        Self::new(vec![FieldMessage::form_level(message)])
    }
}

/// What the protocol layer should do with the backend session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionDirective {
    Unchanged,
    Establish { token: String },
    Clear,
}

/// Status, optional error body, and session directive for one account
/// operation; the endpoint layer serializes this onto the wire.
#[derive(Debug)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub errors: Option<ErrorEnvelope>,
    pub session: SessionDirective,
}

impl BackendResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            errors: None,
            session: SessionDirective::Unchanged,
        }
    }

    #[must_use]
    pub fn validation(errors: Vec<FieldMessage>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            errors: Some(ErrorEnvelope::new(errors)),
            session: SessionDirective::Unchanged,
        }
    }

    #[must_use]
    pub fn failure() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            errors: Some(ErrorEnvelope::form_level(GENERIC_FAILURE_MESSAGE)),
            session: SessionDirective::Unchanged,
        }
    }

    #[must_use]
    pub fn with_session(mut self, session: SessionDirective) -> Self {
        self.session = session;
        self
    }
}
