mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use common::leg_day;
use common::TestApp;
use common::PASSWORD;
use reqwest::header::VARY;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;
use workout_service::domain::token::errors::TokenError;
use workout_service::domain::token::models::Token;
use workout_service::domain::token::ports::TokenServicePort;
use workout_service::domain::user::models::User;
use workout_service::domain::user::models::UserId;

/// Token service whose store is unreachable or hangs
enum BrokenTokenService {
    Failing,
    Stalled,
}

#[async_trait]
impl TokenServicePort for BrokenTokenService {
    async fn create_authentication_token(&self, _: &str, _: &str) -> Result<Token, TokenError> {
        Err(TokenError::DatabaseError("not available".to_string()))
    }

    async fn revoke_authentication_tokens(&self, _: UserId) -> Result<(), TokenError> {
        Err(TokenError::DatabaseError("not available".to_string()))
    }

    async fn resolve_identity(&self, _: &str) -> Result<Option<User>, TokenError> {
        match self {
            BrokenTokenService::Failing => {
                Err(TokenError::DatabaseError("connection refused".to_string()))
            }
            BrokenTokenService::Stalled => {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(None)
            }
        }
    }
}

fn varies_on_authorization(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get_all(VARY)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|value| value.trim().eq_ignore_ascii_case("authorization"))
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").send().await.expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "status": "available" }));
}

#[tokio::test]
async fn test_login_returns_token_expiring_in_a_day() {
    let app = TestApp::spawn().await;
    app.register("nicola").await;

    let response = app
        .post("/tokens/authentication")
        .json(&json!({ "username": "nicola", "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");

    let token = body["auth_token"]["token"].as_str().unwrap();
    assert_eq!(token.len(), 43);

    let expiry: DateTime<Utc> = body["auth_token"]["expiry"]
        .as_str()
        .unwrap()
        .parse()
        .expect("expiry is not RFC 3339");
    let ahead = expiry - Utc::now();
    assert!(ahead > chrono::Duration::hours(23) + chrono::Duration::minutes(59));
    assert!(ahead <= chrono::Duration::hours(24));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("nicola").await;

    for (username, password) in [("nicola", "wrong_password"), ("nobody", PASSWORD)] {
        let response = app
            .post("/tokens/authentication")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body, json!({ "error": "invalid credentials" }));
    }
}

#[tokio::test]
async fn test_login_with_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/tokens/authentication")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "invalid request" }));
}

#[tokio::test]
async fn test_anonymous_passes_public_routes_but_not_the_gate() {
    let app = TestApp::spawn().await;

    let public = app.get("/users/nobody").send().await.unwrap();
    // Reached the handler: anonymous identity is not rejected by the middleware
    assert_eq!(public.status(), StatusCode::NOT_FOUND);

    let protected = app.post("/workouts").json(&leg_day()).send().await.unwrap();
    assert_eq!(protected.status(), StatusCode::UNAUTHORIZED);
    let body: Value = protected.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": "you must be logged in to access this route" })
    );
}

#[tokio::test]
async fn test_malformed_authorization_header_is_bad_request() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in("nicola").await;

    for header in [
        "Bearer".to_string(),
        "Basic xyz".to_string(),
        format!("bearer {}", token),
        format!("Bearer {} extra", token),
    ] {
        // A public route: only the middleware can produce a 400 here
        let response = app
            .get("/health")
            .header("authorization", header.as_str())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{header}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "invalid authorization header" }));
    }
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/health")
        .bearer_auth("this-token-was-never-issued")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "token expired or invalid" }));
}

#[tokio::test]
async fn test_token_identifies_its_owner() {
    let app = TestApp::spawn().await;
    let (user_id, token) = app.signed_in("nicola").await;

    let workout = app.create_workout(&token, leg_day()).await;

    assert_eq!(workout["user_id"], json!(user_id));
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::spawn_with_token_ttl(chrono::Duration::seconds(1)).await;
    let (_, token) = app.signed_in("nicola").await;

    let fresh = app
        .post("/workouts")
        .bearer_auth(&token)
        .json(&leg_day())
        .send()
        .await
        .unwrap();
    assert_eq!(fresh.status(), StatusCode::CREATED);

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;

    let expired = app
        .post("/workouts")
        .bearer_auth(&token)
        .json(&leg_day())
        .send()
        .await
        .unwrap();
    assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
    let body: Value = expired.json().await.unwrap();
    assert_eq!(body, json!({ "error": "token expired or invalid" }));
}

#[tokio::test]
async fn test_logout_revokes_every_session() {
    let app = TestApp::spawn().await;
    let (_, first) = app.signed_in("nicola").await;
    let second = app.login("nicola").await;

    let response = app
        .delete("/tokens/authentication")
        .bearer_auth(&first)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for token in [&first, &second] {
        let response = app.get("/health").bearer_auth(token).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_logout_requires_login() {
    let app = TestApp::spawn().await;

    let response = app.delete("/tokens/authentication").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_every_outcome_varies_on_authorization() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in("nicola").await;

    let responses = [
        app.get("/health").send().await.unwrap(),
        app.get("/health").bearer_auth(&token).send().await.unwrap(),
        app.get("/health").header("authorization", "Basic xyz").send().await.unwrap(),
        app.get("/health").bearer_auth("unknown").send().await.unwrap(),
        app.post("/workouts").json(&leg_day()).send().await.unwrap(),
    ];

    for response in responses {
        assert!(
            varies_on_authorization(&response),
            "missing Vary on {}",
            response.status()
        );
    }
}

#[tokio::test]
async fn test_token_store_failure_is_internal_error() {
    let app = TestApp::spawn_with_token_service(
        Arc::new(BrokenTokenService::Failing),
        Duration::from_secs(30),
    )
    .await;

    let response = app
        .get("/health")
        .bearer_auth("some-token")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(varies_on_authorization(&response));
    let body: Value = response.json().await.unwrap();
    // Not reported as a bad token, and no store detail leaks out
    assert_eq!(body, json!({ "error": "internal server error" }));
}

#[tokio::test]
async fn test_token_lookup_is_bounded_by_request_deadline() {
    let app = TestApp::spawn_with_token_service(
        Arc::new(BrokenTokenService::Stalled),
        Duration::from_millis(200),
    )
    .await;

    let started = std::time::Instant::now();
    let response = app
        .get("/health")
        .bearer_auth("some-token")
        .send()
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(varies_on_authorization(&response));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "request timed out" }));

    // Anonymous requests never touch the store
    let anonymous = app.get("/health").send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::OK);
}
