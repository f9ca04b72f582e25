//! Gateway-owned cookies: the LocalSession, the backend-session pass-through,
//! and the one-time flash notice.
//!
//! The LocalSession only ever comes into existence after a success response
//! from the backend was observed; nothing here infers it from backend state.

use anyhow::{Context, Result};
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};

use super::GatewayConfig;

pub const LOCAL_SESSION_COOKIE: &str = "varco_session";
pub const UPSTREAM_COOKIE: &str = "varco_upstream";
pub const FLASH_COOKIE: &str = "varco_flash";

/// Create a new LocalSession token. The value is opaque; the cookie's
/// presence is the session artifact.
pub fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Build the LocalSession cookie. Remembered sessions persist across browser
/// restarts; others are session-scoped.
pub fn local_session_cookie(
    config: &GatewayConfig,
    token: &str,
    remember: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{LOCAL_SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if remember {
        let ttl = config.remembered_session_ttl_seconds();
        cookie.push_str(&format!("; Max-Age={ttl}"));
    }
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn clear_local_session_cookie(config: &GatewayConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    clear_cookie(LOCAL_SESSION_COOKIE, config)
}

/// Pass-through cookie holding the backend's own session token so logout can
/// present it as credentials.
pub fn upstream_cookie(
    config: &GatewayConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{UPSTREAM_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn clear_upstream_cookie(config: &GatewayConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    clear_cookie(UPSTREAM_COOKIE, config)
}

/// One-time notice shown on the next rendered page, then cleared.
pub fn flash_cookie(message: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let encoded = urlencoding::encode(message);
    HeaderValue::from_str(&format!(
        "{FLASH_COOKIE}={encoded}; Path=/; HttpOnly; SameSite=Lax"
    ))
}

pub fn clear_flash_cookie() -> HeaderValue {
    HeaderValue::from_static("varco_flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn clear_cookie(
    name: &str,
    config: &GatewayConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Read one cookie value from the request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}

pub fn has_local_session(headers: &HeaderMap) -> bool {
    cookie_value(headers, LOCAL_SESSION_COOKIE).is_some()
}

/// Decode the flash notice, if one was set by a previous request.
pub fn take_flash(headers: &HeaderMap) -> Option<String> {
    let raw = cookie_value(headers, FLASH_COOKIE)?;
    urlencoding::decode(&raw).ok().map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GatewayConfig {
        GatewayConfig::new()
    }

    #[test]
    fn remembered_sessions_carry_a_max_age() {
        let cookie = local_session_cookie(&config(), "token", true).expect("valid cookie");
        let value = cookie.to_str().expect("ascii cookie");
        assert!(value.starts_with("varco_session=token;"));
        assert!(value.contains("Max-Age="));
    }

    #[test]
    fn unremembered_sessions_are_session_scoped() {
        let cookie = local_session_cookie(&config(), "token", false).expect("valid cookie");
        let value = cookie.to_str().expect("ascii cookie");
        assert!(!value.contains("Max-Age"));
        assert!(value.contains("HttpOnly"));
    }

    #[test]
    fn clearing_expires_immediately() {
        let cookie = clear_local_session_cookie(&config()).expect("valid cookie");
        assert!(cookie.to_str().expect("ascii").contains("Max-Age=0"));
    }

    #[test]
    fn flash_round_trips_through_url_encoding() {
        let cookie = flash_cookie("Registration complete. Please log in.").expect("valid cookie");
        let value = cookie.to_str().expect("ascii").to_string();
        let pair = value.split(';').next().expect("cookie pair");

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(pair).expect("request cookie"));
        assert_eq!(
            take_flash(&headers),
            Some("Registration complete. Please log in.".to_string())
        );
    }

    #[test]
    fn cookie_value_parses_multiple_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("a=1; varco_session=tok; varco_upstream=up"),
        );
        assert!(has_local_session(&headers));
        assert_eq!(
            cookie_value(&headers, UPSTREAM_COOKIE),
            Some("up".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
