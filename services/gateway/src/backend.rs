//! Outbound client for the identity backend.
//!
//! One bounded-timeout round trip per user action, never retried: a replayed
//! register could be misinterpreted, so failures are surfaced for the browser
//! to resubmit.

use std::time::Duration;

use reqwest::{header::SET_COOKIE, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::APP_USER_AGENT;

/// Name of the backend's own session cookie, as set by `/Account/Login`.
pub const BACKEND_SESSION_COOKIE: &str = "identity_session";

/// Envelope version this gateway understands.
pub const ENVELOPE_VERSION: u16 = 1;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("backend request timed out")]
    Timeout,
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend protocol violation: {0}")]
    Protocol(String),
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

/// The backend's structured validation-error body.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub version: u16,
    pub errors: Vec<FieldMessage>,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|entry| entry.message.as_str())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload<'a> {
    identifier: &'a str,
    secret: &'a str,
    remember_me: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload<'a> {
    identifier: &'a str,
    secret: &'a str,
    confirm_secret: &'a str,
}

/// Decoded result of one backend round trip.
#[derive(Debug)]
pub struct BackendReply {
    pub status: StatusCode,
    /// Parsed envelope on a non-success status; `None` means the body did not
    /// honor the contract (callers decide whether that is fatal).
    pub errors: Option<ErrorEnvelope>,
    /// Backend session token captured from `Set-Cookie` on success.
    pub session_token: Option<String>,
}

pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    /// Build a client with a bounded per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(mut base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        // Normalize so joining relative endpoint paths keeps the full base path.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// POST `/Account/Login`.
    ///
    /// # Errors
    /// Returns a [`BrokerError`] on timeout, connection failure, or a
    /// malformed endpoint URL.
    pub async fn login(
        &self,
        identifier: &str,
        secret: &str,
        remember_me: bool,
    ) -> Result<BackendReply, BrokerError> {
        let url = self.endpoint("Account/Login")?;
        let response = self
            .http
            .post(url)
            .json(&LoginPayload {
                identifier,
                secret,
                remember_me,
            })
            .send()
            .await
            .map_err(map_send_error)?;
        read_reply(response).await
    }

    /// POST `/Account/Register`.
    ///
    /// # Errors
    /// Returns a [`BrokerError`] on timeout, connection failure, or a
    /// malformed endpoint URL.
    pub async fn register(
        &self,
        identifier: &str,
        secret: &str,
        confirm_secret: &str,
    ) -> Result<BackendReply, BrokerError> {
        let url = self.endpoint("Account/Register")?;
        let response = self
            .http
            .post(url)
            .json(&RegisterPayload {
                identifier,
                secret,
                confirm_secret,
            })
            .send()
            .await
            .map_err(map_send_error)?;
        read_reply(response).await
    }

    /// POST `/Account/LogOut`, presenting the backend session cookie when the
    /// gateway still holds one.
    ///
    /// # Errors
    /// Returns a [`BrokerError`] on timeout, connection failure, or a
    /// malformed endpoint URL.
    pub async fn logout(&self, upstream_token: Option<&str>) -> Result<BackendReply, BrokerError> {
        let url = self.endpoint("Account/LogOut")?;
        let mut request = self.http.post(url);
        if let Some(token) = upstream_token {
            request = request.header(
                reqwest::header::COOKIE,
                format!("{BACKEND_SESSION_COOKIE}={token}"),
            );
        }
        let response = request.send().await.map_err(map_send_error)?;
        read_reply(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, BrokerError> {
        self.base_url
            .join(path)
            .map_err(|err| BrokerError::Protocol(format!("invalid endpoint {path}: {err}")))
    }
}

fn map_send_error(err: reqwest::Error) -> BrokerError {
    if err.is_timeout() {
        BrokerError::Timeout
    } else {
        BrokerError::Unreachable(err.to_string())
    }
}

async fn read_reply(response: reqwest::Response) -> Result<BackendReply, BrokerError> {
    let status = response.status();
    if status.is_success() {
        let session_token = extract_backend_session(response.headers());
        return Ok(BackendReply {
            status,
            errors: None,
            session_token,
        });
    }

    let bytes = response.bytes().await.map_err(map_send_error)?;
    Ok(BackendReply {
        status,
        errors: parse_error_envelope(&bytes),
        session_token: None,
    })
}

/// Parse the error envelope from a non-success body. Returns `None` when the
/// body breaks the contract (unparseable, empty, or unknown version).
fn parse_error_envelope(bytes: &[u8]) -> Option<ErrorEnvelope> {
    let envelope: ErrorEnvelope = match serde_json::from_slice(bytes) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!("Unparseable error envelope from backend: {err}");
            return None;
        }
    };
    if envelope.version != ENVELOPE_VERSION {
        warn!("Unknown error envelope version: {}", envelope.version);
        return None;
    }
    if envelope.errors.is_empty() {
        warn!("Error envelope with no entries");
        return None;
    }
    Some(envelope)
}

fn extract_backend_session(headers: &reqwest::header::HeaderMap) -> Option<String> {
    for value in headers.get_all(SET_COOKIE) {
        let Ok(cookie) = value.to_str() else {
            continue;
        };
        let Some(rest) = cookie
            .trim()
            .strip_prefix(BACKEND_SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
        else {
            continue;
        };
        let token = rest.split(';').next().unwrap_or("").trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn parse_error_envelope_accepts_the_contract_shape() {
        let body = br#"{"version":1,"errors":[{"field":"","message":"Invalid login attempt."}]}"#;
        let envelope = parse_error_envelope(body).expect("envelope parses");
        assert_eq!(envelope.first_message(), Some("Invalid login attempt."));
    }

    #[test]
    fn parse_error_envelope_rejects_contract_violations() {
        assert_eq!(parse_error_envelope(b"not json"), None);
        assert_eq!(parse_error_envelope(b"{}"), None);
        assert_eq!(parse_error_envelope(br#"{"version":1,"errors":[]}"#), None);
        assert_eq!(
            parse_error_envelope(br#"{"version":2,"errors":[{"field":"","message":"x"}]}"#),
            None
        );
    }

    #[test]
    fn extract_backend_session_reads_the_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("other=1; Path=/; HttpOnly"),
        );
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("identity_session=abc123; Path=/; HttpOnly; Max-Age=60"),
        );
        assert_eq!(
            extract_backend_session(&headers),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn extract_backend_session_ignores_cleared_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("identity_session=; Path=/; Max-Age=0"),
        );
        assert_eq!(extract_backend_session(&headers), None);
    }

    #[test]
    fn base_url_join_keeps_nested_paths() -> anyhow::Result<()> {
        let client = BackendClient::new(
            Url::parse("http://identity.internal:8081/api")?,
            Duration::from_secs(1),
        )?;
        let url = client.endpoint("Account/Login").expect("joins");
        assert_eq!(url.as_str(), "http://identity.internal:8081/api/Account/Login");
        Ok(())
    }
}
