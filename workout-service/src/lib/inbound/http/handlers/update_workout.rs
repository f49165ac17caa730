use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::create_workout::entries_from_request;
use super::create_workout::WorkoutEntryRequest;
use super::ensure_owner;
use super::get_workout::WorkoutResponseData;
use super::parse_workout_id;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::workout::errors::WorkoutValidationError;
use crate::domain::workout::models::UpdateWorkoutCommand;
use crate::domain::workout::ports::WorkoutServicePort;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn update_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateWorkoutRequest>,
) -> Result<ApiSuccess<WorkoutResponseData>, ApiError> {
    let id = parse_workout_id(&id)?;
    ensure_owner(&state, id, &user).await?;

    let command = body
        .try_into_command()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .workout_service
        .update_workout(id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref workout| ApiSuccess::new(StatusCode::OK, workout.into()))
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateWorkoutRequest {
    title: Option<String>,
    description: Option<String>,
    duration_minutes: Option<i32>,
    calories_burned: Option<i32>,
    entries: Option<Vec<WorkoutEntryRequest>>,
}

impl UpdateWorkoutRequest {
    fn try_into_command(self) -> Result<UpdateWorkoutCommand, WorkoutValidationError> {
        Ok(UpdateWorkoutCommand {
            title: self.title,
            description: self.description,
            duration_minutes: self.duration_minutes,
            calories_burned: self.calories_burned,
            entries: self.entries.map(entries_from_request).transpose()?,
        })
    }
}
