use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ensure_owner;
use super::parse_workout_id;
use super::ApiError;
use crate::domain::workout::ports::WorkoutServicePort;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn delete_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_workout_id(&id)?;
    ensure_owner(&state, id, &user).await?;

    state
        .workout_service
        .delete_workout(id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
