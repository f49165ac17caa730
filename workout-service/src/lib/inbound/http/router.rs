use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_token::create_token;
use super::handlers::create_workout::create_workout;
use super::handlers::delete_tokens::delete_tokens;
use super::handlers::delete_workout::delete_workout;
use super::handlers::get_user::get_user;
use super::handlers::get_workout::get_workout;
use super::handlers::health::health;
use super::handlers::register_user::register_user;
use super::handlers::update_workout::update_workout;
use super::middleware::authenticate;
use super::middleware::enforce_deadline;
use super::middleware::require_user;
use crate::domain::token::ports::TokenServicePort;
use crate::domain::user::ports::UserServicePort;
use crate::domain::workout::ports::WorkoutServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub token_service: Arc<dyn TokenServicePort>,
    pub workout_service: Arc<dyn WorkoutServicePort>,
}

/// Build the HTTP application.
///
/// Every route sits behind [`authenticate`]; the protected group is further
/// gated by [`require_user`]. [`enforce_deadline`] wraps both and bounds the
/// whole request, token lookup included, to `request_timeout`.
pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    token_service: Arc<dyn TokenServicePort>,
    workout_service: Arc<dyn WorkoutServicePort>,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        user_service,
        token_service,
        workout_service,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/users", post(register_user))
        .route("/users/:username", get(get_user))
        .route("/tokens/authentication", post(create_token))
        .route("/workouts/:id", get(get_workout));

    let protected_routes = Router::new()
        .route("/tokens/authentication", delete(delete_tokens))
        .route("/workouts", post(create_workout))
        .route("/workouts/:id", delete(delete_workout).put(update_workout))
        .route_layer(middleware::from_fn(require_user));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers are left out: they carry bearer tokens
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(middleware::from_fn_with_state(
            request_timeout,
            enforce_deadline,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
