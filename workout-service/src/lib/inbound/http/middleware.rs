use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::models::Identity;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

const BEARER_SCHEME: &str = "Bearer";

/// Outcome of parsing the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
enum Credential {
    Absent,
    Bearer(String),
    Malformed,
}

/// Resolves who is calling and stores an [`Identity`] in the request
/// extensions.
///
/// No header means [`Identity::Anonymous`]. A header that is not exactly
/// `Bearer <token>` is rejected with 400 and a token that is unknown, expired
/// or of another scope with 401; the handler is not run in either case.
/// Every response leaving this layer varies on `Authorization`.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let mut response = match bearer_credential(&req) {
        Credential::Absent => {
            req.extensions_mut().insert(Identity::Anonymous);
            next.run(req).await
        }
        Credential::Malformed => {
            tracing::warn!(path = %req.uri().path(), "Malformed authorization header");
            ApiError::BadRequest("invalid authorization header".to_string()).into_response()
        }
        Credential::Bearer(token) => match state.token_service.resolve_identity(&token).await {
            Ok(Some(user)) => {
                tracing::debug!(user_id = %user.id, "Request authenticated");
                req.extensions_mut()
                    .insert(Identity::User(Arc::new(user)));
                next.run(req).await
            }
            Ok(None) => {
                tracing::warn!(path = %req.uri().path(), "Unknown or expired token");
                ApiError::Unauthorized("token expired or invalid".to_string()).into_response()
            }
            Err(e) => ApiError::InternalServerError(format!("token lookup failed: {}", e))
                .into_response(),
        },
    };

    vary_on_authorization(&mut response);
    response
}

/// Bounds the whole request, token lookup included.
///
/// The inner future is dropped once `timeout` elapses and the caller gets a
/// 408 in the usual error envelope.
pub async fn enforce_deadline(
    State(timeout): State<Duration>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();

    match tokio::time::timeout(timeout, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                path = %path,
                timeout_ms = timeout.as_millis() as u64,
                "Request deadline exceeded"
            );
            let mut response =
                ApiError::RequestTimeout("request timed out".to_string()).into_response();
            vary_on_authorization(&mut response);
            response
        }
    }
}

fn vary_on_authorization(response: &mut Response) {
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));
}

fn bearer_credential(req: &Request) -> Credential {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Credential::Absent;
    };
    let Ok(value) = value.to_str() else {
        return Credential::Malformed;
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => {
            Credential::Bearer(token.to_string())
        }
        _ => Credential::Malformed,
    }
}

/// Rejects anonymous callers on the routes it wraps.
pub async fn require_user(identity: Identity, req: Request, next: Next) -> Response {
    if identity.is_anonymous() {
        return ApiError::Unauthorized("you must be logged in to access this route".to_string())
            .into_response();
    }

    next.run(req).await
}

fn identity_from_parts(parts: &Parts) -> Identity {
    parts
        .extensions
        .get::<Identity>()
        .cloned()
        .expect("Identity missing from request extensions: route is not behind the authenticate middleware")
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(identity_from_parts(parts))
    }
}

/// Authenticated caller, for handlers on protected routes.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Arc<User>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_parts(parts)
            .user()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                ApiError::Unauthorized("you must be logged in to access this route".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use super::*;

    fn request_with(authorization: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_credential_parsing() {
        assert_eq!(bearer_credential(&request_with(None)), Credential::Absent);
        assert_eq!(
            bearer_credential(&request_with(Some("Bearer abc123"))),
            Credential::Bearer("abc123".to_string())
        );

        for malformed in [
            "",
            "Bearer",
            "Bearer ",
            "Basic xyz",
            "bearer abc123",
            "Bearer abc 123",
            "Bearer  abc123",
            "Token abc123",
        ] {
            assert_eq!(
                bearer_credential(&request_with(Some(malformed))),
                Credential::Malformed,
                "{malformed:?} should be malformed"
            );
        }
    }

    #[tokio::test]
    async fn test_deadline_answers_408_with_envelope() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "too late"
                }),
            )
            .route("/fast", get(|| async { "in time" }))
            .layer(axum::middleware::from_fn_with_state(
                Duration::from_millis(50),
                enforce_deadline,
            ));

        let request = |uri: &str| {
            axum::http::Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };

        let fast = app.clone().oneshot(request("/fast")).await.unwrap();
        assert_eq!(fast.status(), axum::http::StatusCode::OK);

        let slow = app.oneshot(request("/slow")).await.unwrap();
        assert_eq!(slow.status(), axum::http::StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            slow.headers().get(header::VARY),
            Some(&HeaderValue::from_static("Authorization"))
        );
        let body = axum::body::to_bytes(slow.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "request timed out" }));
    }

    #[tokio::test]
    #[should_panic(expected = "Identity missing from request extensions")]
    async fn test_identity_without_middleware_fails_fast() {
        let app = Router::new().route("/", get(|_identity: Identity| async { "unreachable" }));

        let _ = app.oneshot(request_with(None)).await;
    }
}
