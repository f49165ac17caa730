use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::get_workout::WorkoutResponseData;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::workout::errors::WorkoutValidationError;
use crate::domain::workout::models::ExerciseMeasure;
use crate::domain::workout::models::NewWorkoutEntry;
use crate::domain::workout::models::WorkoutDraft;
use crate::domain::workout::ports::WorkoutServicePort;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn create_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<CreateWorkoutRequest>,
) -> Result<ApiSuccess<WorkoutResponseData>, ApiError> {
    let draft = body.try_into_draft().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .workout_service
        .create_workout(user.id, draft)
        .await
        .map_err(ApiError::from)
        .map(|ref workout| ApiSuccess::new(StatusCode::CREATED, workout.into()))
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutRequest {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    duration_minutes: i32,
    #[serde(default)]
    calories_burned: i32,
    #[serde(default)]
    entries: Vec<WorkoutEntryRequest>,
}

impl CreateWorkoutRequest {
    fn try_into_draft(self) -> Result<WorkoutDraft, WorkoutValidationError> {
        WorkoutDraft::new(
            self.title,
            self.description,
            self.duration_minutes,
            self.calories_burned,
            entries_from_request(self.entries)?,
        )
    }
}

/// One exercise line as submitted by clients.
///
/// `order_index` defaults to the position in the submitted list.
#[derive(Debug, Deserialize)]
pub struct WorkoutEntryRequest {
    exercise_name: String,
    sets: i32,
    reps: Option<i32>,
    duration_seconds: Option<i32>,
    weight: Option<f64>,
    #[serde(default)]
    notes: String,
    order_index: Option<i32>,
}

pub(super) fn entries_from_request(
    entries: Vec<WorkoutEntryRequest>,
) -> Result<Vec<NewWorkoutEntry>, WorkoutValidationError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let measure = ExerciseMeasure::from_parts(index, entry.reps, entry.duration_seconds)?;
            NewWorkoutEntry::new(
                index,
                entry.exercise_name,
                entry.sets,
                measure,
                entry.weight,
                entry.notes,
                entry.order_index.unwrap_or(index as i32),
            )
        })
        .collect()
}
