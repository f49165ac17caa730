use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::router::AppState;
use crate::domain::token::errors::TokenError;
use crate::domain::user::models::User;
use crate::domain::workout::errors::WorkoutError;
use crate::domain::workout::models::WorkoutId;
use crate::domain::workout::ports::WorkoutServicePort;
use crate::user::errors::UserError;

pub mod create_token;
pub mod create_workout;
pub mod delete_tokens;
pub mod delete_workout;
pub mod get_user;
pub mod get_workout;
pub mod health;
pub mod register_user;
pub mod update_workout;

pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Client-facing failure. Rendered as `{"error": "<message>"}`.
///
/// `InternalServerError` carries the detail for the log only; the client
/// always sees [`INTERNAL_ERROR_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    RequestTimeout(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::RequestTimeout(msg) => (StatusCode::REQUEST_TIMEOUT, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest("invalid request".to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFoundByUsername(_) => ApiError::NotFound("user not found".to_string()),
            UserError::UsernameAlreadyExists(_) => {
                ApiError::Conflict("a user with this username already exists".to_string())
            }
            UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict("a user with this email already exists".to_string())
            }
            UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_) => ApiError::BadRequest(err.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidCredentials => {
                ApiError::Unauthorized("invalid credentials".to_string())
            }
            TokenError::Generation(_)
            | TokenError::Password(_)
            | TokenError::User(_)
            | TokenError::DatabaseError(_)
            | TokenError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<WorkoutError> for ApiError {
    fn from(err: WorkoutError) -> Self {
        match err {
            WorkoutError::Invalid(reason) => ApiError::BadRequest(reason.to_string()),
            WorkoutError::NotFound(_) => ApiError::NotFound("workout does not exist".to_string()),
            WorkoutError::DatabaseError(_) | WorkoutError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// `Json` whose rejection renders as an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

fn parse_workout_id(raw: &str) -> Result<WorkoutId, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(WorkoutId)
        .ok_or_else(|| ApiError::BadRequest("invalid workout id".to_string()))
}

/// 404 if the workout is missing, 403 if it belongs to someone else.
async fn ensure_owner(state: &AppState, id: WorkoutId, user: &User) -> Result<(), ApiError> {
    let owner = state.workout_service.get_workout_owner(id).await?;

    if owner != user.id {
        tracing::warn!(workout_id = %id, user_id = %user.id, "Ownership check failed");
        return Err(ApiError::Forbidden(
            "you are not authorized for this action".to_string(),
        ));
    }
    Ok(())
}
