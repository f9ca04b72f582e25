//! IdentityCore: owns user records and executes create/authenticate against
//! the user store. No network knowledge lives here.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

pub mod outcome;
pub mod password;
pub mod store;
mod validate;

pub use outcome::{AuthOutcome, FieldMessage};
pub use store::{InsertOutcome, MemoryStore, PgStore, SessionStore, StoreError, UserRecord, UserStore};
pub(crate) use validate::normalize_identifier;
use validate::valid_identifier;

/// A transient identifier/secret pair. Never persisted as plaintext.
#[derive(Clone)]
pub struct Credential {
    pub identifier: String,
    pub secret: String,
}

impl Credential {
    #[must_use]
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"***")
            .finish()
    }
}

/// Capability: create a user record from a credential.
#[async_trait]
pub trait CreateUser: Send + Sync {
    async fn create_user(&self, credential: &Credential, confirm_secret: &str) -> AuthOutcome;
}

/// Capability: check a credential against the stored records.
#[async_trait]
pub trait AuthenticateCredential: Send + Sync {
    async fn authenticate(&self, credential: &Credential) -> AuthOutcome;
}

pub struct IdentityCore {
    store: Arc<dyn UserStore>,
}

impl IdentityCore {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    async fn register(&self, credential: &Credential, confirm_secret: &str) -> AuthOutcome {
        let identifier = normalize_identifier(&credential.identifier);

        let mut errors = Vec::new();
        if credential.secret != confirm_secret {
            errors.push(FieldMessage::new(
                "confirmSecret",
                "The password and confirmation password do not match.",
            ));
        }
        if !valid_identifier(&identifier) {
            errors.push(FieldMessage::new(
                "identifier",
                format!("Email '{}' is invalid.", credential.identifier.trim()),
            ));
        }
        if !errors.is_empty() {
            return AuthOutcome::ValidationFailed(errors);
        }

        let secret_hash = match password::hash_secret(&credential.secret) {
            Ok(hash) => hash,
            Err(err) => {
                error!("Failed to hash secret: {err:?}");
                return AuthOutcome::SystemFailure("secret hashing failed".to_string());
            }
        };

        match self.store.insert_user(&identifier, &secret_hash).await {
            Ok(InsertOutcome::Created) => AuthOutcome::Success,
            Ok(InsertOutcome::Conflict) => {
                debug!("Identifier already taken");
                AuthOutcome::ValidationFailed(vec![FieldMessage::form_level(format!(
                    "Email '{identifier}' is already taken."
                ))])
            }
            Err(err) => {
                error!("Error inserting user: {err:?}");
                AuthOutcome::SystemFailure("failed to persist user".to_string())
            }
        }
    }

    async fn check(&self, credential: &Credential) -> AuthOutcome {
        let identifier = normalize_identifier(&credential.identifier);

        match self.store.find_user(&identifier).await {
            Ok(Some(record)) => {
                if password::verify_secret(&record.secret_hash, &credential.secret) {
                    AuthOutcome::Success
                } else {
                    AuthOutcome::InvalidCredentials
                }
            }
            Ok(None) => {
                // Same code path and roughly the same cost as a real mismatch,
                // so the outcome and timing stay indistinguishable.
                let _ = password::verify_dummy(&credential.secret);
                AuthOutcome::InvalidCredentials
            }
            Err(err) => {
                error!("Error looking up user: {err:?}");
                AuthOutcome::SystemFailure("failed to look up user".to_string())
            }
        }
    }
}

#[async_trait]
impl CreateUser for IdentityCore {
    async fn create_user(&self, credential: &Credential, confirm_secret: &str) -> AuthOutcome {
        self.register(credential, confirm_secret).await
    }
}

#[async_trait]
impl AuthenticateCredential for IdentityCore {
    async fn authenticate(&self, credential: &Credential) -> AuthOutcome {
        self.check(credential).await
    }
}
