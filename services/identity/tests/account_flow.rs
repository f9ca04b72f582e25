//! Wire-contract tests for the account endpoints, driven through the real
//! router with the in-memory store.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use varco_identity::{
    api,
    core::{IdentityCore, MemoryStore},
    session::{AuthConfig, AuthSessionManager},
};

fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let core = Arc::new(IdentityCore::new(store.clone()));
    let manager = Arc::new(AuthSessionManager::new(
        core.clone(),
        core,
        store,
        AuthConfig::new(),
    ));
    api::app(manager, None).expect("router builds")
}

async fn post_json(app: &Router, path: &str, body: Value) -> Result<axum::response::Response> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?;
    app.clone().oneshot(request).await.context("request failed")
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    serde_json::from_slice(&bytes).context("body is not JSON")
}

fn register_body(identifier: &str, secret: &str, confirm: &str) -> Value {
    json!({ "identifier": identifier, "secret": secret, "confirmSecret": confirm })
}

fn login_body(identifier: &str, secret: &str) -> Value {
    json!({ "identifier": identifier, "secret": secret, "rememberMe": false })
}

#[tokio::test]
async fn register_then_login_sets_a_session_cookie() -> Result<()> {
    let app = app();

    let response = post_json(
        &app,
        "/Account/Register",
        register_body("test@test.com", "hunter2secret", "hunter2secret"),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(bytes.is_empty(), "success body must be empty");

    let response = post_json(
        &app,
        "/Account/Login",
        login_body("test@test.com", "hunter2secret"),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .context("session cookie missing")?
        .to_str()?;
    assert!(cookie.starts_with("identity_session="));
    assert!(cookie.contains("HttpOnly"));
    Ok(())
}

#[tokio::test]
async fn register_mismatch_returns_the_field_scoped_envelope() -> Result<()> {
    let app = app();

    let response = post_json(
        &app,
        "/Account/Register",
        register_body("test@test.com", "hunter2secret", "different"),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await?;
    assert_eq!(body["version"], 1);
    assert_eq!(body["errors"][0]["field"], "confirmSecret");
    assert_eq!(
        body["errors"][0]["message"],
        "The password and confirmation password do not match."
    );
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_a_validation_failure() -> Result<()> {
    let app = app();
    let body = register_body("test@test.com", "hunter2secret", "hunter2secret");

    let response = post_json(&app, "/Account/Register", body.clone()).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, "/Account/Register", body).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["errors"][0]["field"], "");
    assert_eq!(
        body["errors"][0]["message"],
        "Email 'test@test.com' is already taken."
    );
    Ok(())
}

#[tokio::test]
async fn wrong_secret_yields_exactly_the_fixed_message() -> Result<()> {
    let app = app();

    let response = post_json(
        &app,
        "/Account/Register",
        register_body("test@test.com", "hunter2secret", "hunter2secret"),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, "/Account/Login", login_body("test@test.com", "wrong")).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        response.headers().get(header::SET_COOKIE).is_none(),
        "failed login must not set cookies"
    );
    let body = body_json(response).await?;
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["errors"][0]["field"], "");
    assert_eq!(body["errors"][0]["message"], "Invalid login attempt.");
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_indistinguishable_from_wrong_secret() -> Result<()> {
    let app = app();

    let response = post_json(&app, "/Account/Login", login_body("nobody@test.com", "x")).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["errors"][0]["message"], "Invalid login attempt.");
    Ok(())
}

#[tokio::test]
async fn empty_secret_short_circuits_with_a_required_field_error() -> Result<()> {
    let app = app();

    let response = post_json(&app, "/Account/Login", login_body("test@test.com", "")).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["errors"][0]["field"], "secret");
    assert_eq!(body["errors"][0]["message"], "The Password field is required.");
    Ok(())
}

#[tokio::test]
async fn logout_without_a_session_still_clears_the_cookie() -> Result<()> {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/Account/LogOut")
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .context("clearing cookie missing")?
        .to_str()?;
    assert!(cookie.starts_with("identity_session=;"));
    assert!(cookie.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_presented_session() -> Result<()> {
    let app = app();

    let response = post_json(
        &app,
        "/Account/Register",
        register_body("test@test.com", "hunter2secret", "hunter2secret"),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        &app,
        "/Account/Login",
        login_body("test@test.com", "hunter2secret"),
    )
    .await?;
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .context("session cookie missing")?
        .to_str()?
        .split(';')
        .next()
        .context("cookie pair missing")?
        .to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/Account/LogOut")
        .header(header::COOKIE, cookie)
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn missing_payload_is_a_bad_request_with_an_envelope() -> Result<()> {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/Account/Login")
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["errors"][0]["message"], "Missing payload.");
    Ok(())
}

#[tokio::test]
async fn health_reports_name_and_version() -> Result<()> {
    let app = app();

    let request = Request::builder().uri("/health").body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));
    let body = body_json(response).await?;
    assert_eq!(body["name"], "varco-identity");
    Ok(())
}
