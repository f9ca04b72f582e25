//! # varco-identity
//!
//! Backend identity API for the varco authentication handoff. It owns the
//! user records and executes register/authenticate/logout against a pluggable
//! user store, then exposes the result over a small machine-readable HTTP
//! surface consumed by the gateway.
//!
//! ## Error envelope
//!
//! Every non-success response carries a versioned envelope with an ordered
//! list of `{field, message}` entries. Form-level messages use an empty
//! `field`. Callers must treat a missing or empty envelope on a non-success
//! status as a protocol violation.
//!
//! ## Anti-enumeration
//!
//! Login failures never distinguish "no such user" from "wrong password":
//! both produce the same envelope, and password verification runs against a
//! dummy hash when the user is absent so timing does not leak the difference.

pub mod api;
pub mod cli;
pub mod core;
pub mod session;

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
