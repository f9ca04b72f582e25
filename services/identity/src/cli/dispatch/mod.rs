//! Command-line argument dispatch and server initialization.

use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8081);
    let dsn = matches.get_one::<String>("dsn").cloned();
    let session_ttl_seconds = matches
        .get_one::<i64>("session-ttl-seconds")
        .copied()
        .context("missing argument: --session-ttl-seconds")?;
    let secure_cookies = matches.get_flag("secure-cookies");
    let gateway_origin = matches.get_one::<String>("gateway-origin").cloned();

    Ok(Action::Server(Args {
        port,
        dsn,
        session_ttl_seconds,
        secure_cookies,
        gateway_origin,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_when_dsn_absent() {
        temp_env::with_vars([("IDENTITY_DSN", None::<&str>)], || {
            let command = crate::cli::commands::new();
            let matches = command.get_matches_from(vec!["varco-identity"]);
            let action = handler(&matches).expect("dispatch succeeds");
            let Action::Server(args) = action;
            assert_eq!(args.port, 8081);
            assert_eq!(args.dsn, None);
            assert_eq!(args.session_ttl_seconds, 43200);
            assert!(!args.secure_cookies);
        });
    }

    #[test]
    fn dsn_and_origin_are_forwarded() {
        let command = crate::cli::commands::new();
        let matches = command.get_matches_from(vec![
            "varco-identity",
            "--dsn",
            "postgres://localhost/identity",
            "--gateway-origin",
            "http://localhost:8080",
            "--secure-cookies",
        ]);
        let Action::Server(args) = handler(&matches).expect("dispatch succeeds");
        assert_eq!(args.dsn.as_deref(), Some("postgres://localhost/identity"));
        assert_eq!(args.gateway_origin.as_deref(), Some("http://localhost:8080"));
        assert!(args.secure_cookies);
    }
}
