//! AuthSessionManager: wraps identity-core outcomes into protocol-level
//! responses for the account endpoints.
//!
//! All operations validate required-field presence and short-circuit to a 400
//! before touching the core, so the core never sees structurally invalid
//! input. Login failures of any kind collapse into one fixed message.

use std::sync::Arc;

use tracing::error;

use crate::core::{
    normalize_identifier, AuthOutcome, AuthenticateCredential, CreateUser, Credential,
    FieldMessage, SessionStore,
};

mod config;
mod response;
mod tokens;

pub use config::AuthConfig;
pub use response::{
    BackendResponse, ErrorEnvelope, SessionDirective, ENVELOPE_VERSION, GENERIC_FAILURE_MESSAGE,
};
use tokens::{generate_session_token, hash_session_token};

pub const INVALID_LOGIN_MESSAGE: &str = "Invalid login attempt.";

fn required(field: &str, label: &str) -> FieldMessage {
    FieldMessage::new(field, format!("The {label} field is required."))
}

pub struct AuthSessionManager {
    registrar: Arc<dyn CreateUser>,
    authenticator: Arc<dyn AuthenticateCredential>,
    sessions: Arc<dyn SessionStore>,
    config: AuthConfig,
}

impl AuthSessionManager {
    #[must_use]
    pub fn new(
        registrar: Arc<dyn CreateUser>,
        authenticator: Arc<dyn AuthenticateCredential>,
        sessions: Arc<dyn SessionStore>,
        config: AuthConfig,
    ) -> Self {
        Self {
            registrar,
            authenticator,
            sessions,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub async fn handle_login(&self, credential: Credential) -> BackendResponse {
        let mut missing = Vec::new();
        if credential.identifier.trim().is_empty() {
            missing.push(required("identifier", "Email"));
        }
        if credential.secret.is_empty() {
            missing.push(required("secret", "Password"));
        }
        if !missing.is_empty() {
            return BackendResponse::validation(missing);
        }

        match self.authenticator.authenticate(&credential).await {
            AuthOutcome::Success => match self.establish_session(&credential.identifier).await {
                Ok(token) => {
                    BackendResponse::ok().with_session(SessionDirective::Establish { token })
                }
                Err(err) => {
                    error!("Failed to establish session: {err:?}");
                    BackendResponse::failure()
                }
            },
            // Lockout state must not be enumerable either.
            AuthOutcome::InvalidCredentials
            | AuthOutcome::AccountLocked
            | AuthOutcome::ValidationFailed(_) => {
                BackendResponse::validation(vec![FieldMessage::form_level(INVALID_LOGIN_MESSAGE)])
            }
            AuthOutcome::SystemFailure(detail) => {
                error!("Authentication failed: {detail}");
                BackendResponse::failure()
            }
        }
    }

    pub async fn handle_register(
        &self,
        credential: Credential,
        confirm_secret: &str,
    ) -> BackendResponse {
        let mut missing = Vec::new();
        if credential.identifier.trim().is_empty() {
            missing.push(required("identifier", "Email"));
        }
        if credential.secret.is_empty() {
            missing.push(required("secret", "Password"));
        }
        if confirm_secret.is_empty() {
            missing.push(required("confirmSecret", "Confirm password"));
        }
        if !missing.is_empty() {
            return BackendResponse::validation(missing);
        }

        match self.registrar.create_user(&credential, confirm_secret).await {
            AuthOutcome::Success => BackendResponse::ok(),
            AuthOutcome::ValidationFailed(errors) => BackendResponse::validation(errors),
            AuthOutcome::SystemFailure(detail) => {
                error!("Registration failed: {detail}");
                BackendResponse::failure()
            }
            outcome @ (AuthOutcome::InvalidCredentials | AuthOutcome::AccountLocked) => {
                error!("Unexpected outcome from register: {outcome:?}");
                BackendResponse::failure()
            }
        }
    }

    /// Idempotent: revoking an absent or already-revoked session still
    /// succeeds, and the cookie is always explicitly cleared.
    pub async fn handle_logout(&self, token: Option<&str>) -> BackendResponse {
        if let Some(token) = token {
            let session_hash = hash_session_token(token);
            if let Err(err) = self.sessions.delete_session(&session_hash).await {
                error!("Failed to delete session: {err}");
            }
        }
        BackendResponse::ok().with_session(SessionDirective::Clear)
    }

    async fn establish_session(&self, identifier: &str) -> anyhow::Result<String> {
        let token = generate_session_token()?;
        let session_hash = hash_session_token(&token);
        self.sessions
            .insert_session(
                &normalize_identifier(identifier),
                session_hash,
                self.config.session_ttl_seconds(),
            )
            .await?;
        Ok(token)
    }
}
