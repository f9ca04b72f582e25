//! Browser form DTOs and their local validation.
//!
//! Failing forms never leave the gateway: required-field and format problems
//! re-render with errors instead of spending a backend round trip.

use std::fmt;

use regex::Regex;
use serde::Deserialize;

/// One validation message for a form. Form-level entries use an empty field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub field: String,
    pub message: String,
}

impl FormError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn form_level(message: impl Into<String>) -> Self {
        Self::new("", message)
    }
}

fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    // HTML checkboxes post "on" when ticked and nothing otherwise.
    #[serde(default)]
    pub remember_me: Option<String>,
}

impl LoginForm {
    #[must_use]
    pub fn remember(&self) -> bool {
        self.remember_me.is_some()
    }

    #[must_use]
    pub fn validate(&self) -> Vec<FormError> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FormError::new("email", "The Email field is required."));
        } else if !valid_email(self.email.trim()) {
            errors.push(FormError::new(
                "email",
                "The Email field is not a valid e-mail address.",
            ));
        }
        if self.password.is_empty() {
            errors.push(FormError::new("password", "The Password field is required."));
        }
        errors
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"***")
            .field("remember_me", &self.remember())
            .finish()
    }
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    #[must_use]
    pub fn validate(&self) -> Vec<FormError> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FormError::new("email", "The Email field is required."));
        } else if !valid_email(self.email.trim()) {
            errors.push(FormError::new(
                "email",
                "The Email field is not a valid e-mail address.",
            ));
        }
        if self.password.is_empty() {
            errors.push(FormError::new("password", "The Password field is required."));
        }
        if self.confirm_password.is_empty() {
            errors.push(FormError::new(
                "confirm_password",
                "The Confirm password field is required.",
            ));
        } else if self.password != self.confirm_password {
            errors.push(FormError::new(
                "confirm_password",
                "The password and confirmation password do not match.",
            ));
        }
        errors
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("email", &self.email)
            .field("password", &"***")
            .field("confirm_password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
            remember_me: None,
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = login("", "").validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn login_rejects_malformed_email() {
        let errors = login("not-an-email", "hunter2secret").validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
        assert!(errors[0].message.contains("not a valid e-mail"));
    }

    #[test]
    fn login_with_valid_fields_passes() {
        assert!(login("test@test.com", "hunter2secret").validate().is_empty());
    }

    #[test]
    fn remember_me_checkbox_maps_to_bool() {
        let mut form = login("test@test.com", "hunter2secret");
        assert!(!form.remember());
        form.remember_me = Some("on".to_string());
        assert!(form.remember());
    }

    #[test]
    fn register_flags_mismatched_confirmation() {
        let form = RegisterForm {
            email: "test@test.com".to_string(),
            password: "hunter2secret".to_string(),
            confirm_password: "different".to_string(),
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "confirm_password");
    }

    #[test]
    fn form_debug_redacts_passwords() {
        let form = RegisterForm {
            email: "test@test.com".to_string(),
            password: "hunter2secret".to_string(),
            confirm_password: "hunter2secret".to_string(),
        };
        assert!(!format!("{form:?}").contains("hunter2secret"));
    }
}
