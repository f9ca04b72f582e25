//! Outcomes of identity operations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single field-scoped validation message.
///
/// Form-level messages (not attached to any input) use an empty `field`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

impl FieldMessage {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// A message scoped to the whole form rather than a single field.
    #[must_use]
    pub fn form_level(message: impl Into<String>) -> Self {
        Self::new("", message)
    }
}

/// Result of a register or authenticate attempt.
///
/// `InvalidCredentials` deliberately covers both "no such user" and "wrong
/// secret" so callers cannot enumerate accounts from the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    InvalidCredentials,
    /// Reserved for lockout policies; no current flow produces it.
    AccountLocked,
    /// Ordered, client-correctable field messages.
    ValidationFailed(Vec<FieldMessage>),
    /// Store or hashing failure; the detail stays server-side.
    SystemFailure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_level_uses_empty_field() {
        let message = FieldMessage::form_level("Invalid login attempt.");
        assert_eq!(message.field, "");
        assert_eq!(message.message, "Invalid login attempt.");
    }

    #[test]
    fn field_message_serializes_both_keys() {
        let value = serde_json::to_value(FieldMessage::new("identifier", "required"))
            .expect("serialize field message");
        assert_eq!(value["field"], "identifier");
        assert_eq!(value["message"], "required");
    }

    #[test]
    fn outcome_debug_names() {
        assert_eq!(format!("{:?}", AuthOutcome::Success), "Success");
        assert_eq!(
            format!("{:?}", AuthOutcome::InvalidCredentials),
            "InvalidCredentials"
        );
    }
}
