//! Command-line argument dispatch and server initialization.

use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};
use url::Url;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or the backend URL is
/// malformed.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let backend_url = matches
        .get_one::<String>("backend-url")
        .context("missing required argument: --backend-url")?;
    let backend_url = Url::parse(backend_url).context("invalid GATEWAY_BACKEND_URL")?;
    let backend_timeout_seconds = matches
        .get_one::<u64>("backend-timeout-seconds")
        .copied()
        .context("missing argument: --backend-timeout-seconds")?;
    let session_ttl_seconds = matches
        .get_one::<i64>("session-ttl-seconds")
        .copied()
        .context("missing argument: --session-ttl-seconds")?;
    let secure_cookies = matches.get_flag("secure-cookies");

    Ok(Action::Server(Args {
        port,
        backend_url,
        backend_timeout_seconds,
        session_ttl_seconds,
        secure_cookies,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_malformed_backend_url() {
        let command = crate::cli::commands::new();
        let matches =
            command.get_matches_from(vec!["varco-gateway", "--backend-url", "not a url"]);
        let result = handler(&matches);
        assert!(result.is_err());
        if let Err(err) = result {
            assert!(err.to_string().contains("invalid GATEWAY_BACKEND_URL"));
        }
    }

    #[test]
    fn builds_the_server_action() {
        let command = crate::cli::commands::new();
        let matches = command.get_matches_from(vec![
            "varco-gateway",
            "--backend-url",
            "http://localhost:8081",
        ]);
        let Action::Server(args) = handler(&matches).expect("dispatch succeeds");
        assert_eq!(args.port, 8080);
        assert_eq!(args.backend_url.as_str(), "http://localhost:8081/");
        assert_eq!(args.backend_timeout_seconds, 10);
    }
}
