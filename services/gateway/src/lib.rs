//! # varco-gateway
//!
//! Browser-facing controller of the varco authentication handoff. It never
//! validates credentials itself: every register/login/logout form submission
//! is forwarded to the identity backend, and only the protocol-level result
//! decides whether a local session cookie is established or torn down.
//!
//! The gateway's session is completely independent of whatever session the
//! backend also maintains; the backend's own cookie is carried in a separate
//! pass-through cookie so logout can present it as credentials.

pub mod backend;
pub mod cli;
pub mod web;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
