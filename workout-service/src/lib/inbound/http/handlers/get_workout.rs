use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::parse_workout_id;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::workout::models::Workout;
use crate::domain::workout::models::WorkoutEntry;
use crate::domain::workout::ports::WorkoutServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<WorkoutResponseData>, ApiError> {
    let id = parse_workout_id(&id)?;

    state
        .workout_service
        .get_workout(id)
        .await
        .map_err(ApiError::from)
        .map(|ref workout| ApiSuccess::new(StatusCode::OK, workout.into()))
}

/// `{"workout": {...}}` envelope shared by the workout routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutResponseData {
    pub workout: WorkoutData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutData {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub entries: Vec<WorkoutEntryData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutEntryData {
    pub id: i64,
    pub exercise_name: String,
    pub sets: i32,
    pub reps: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub weight: Option<f64>,
    pub notes: String,
    pub order_index: i32,
}

impl From<&WorkoutEntry> for WorkoutEntryData {
    fn from(entry: &WorkoutEntry) -> Self {
        Self {
            id: entry.id,
            exercise_name: entry.exercise_name.clone(),
            sets: entry.sets,
            reps: entry.measure.reps(),
            duration_seconds: entry.measure.duration_seconds(),
            weight: entry.weight,
            notes: entry.notes.clone(),
            order_index: entry.order_index,
        }
    }
}

impl From<&Workout> for WorkoutResponseData {
    fn from(workout: &Workout) -> Self {
        Self {
            workout: WorkoutData {
                id: workout.id.0,
                user_id: workout.user_id.0,
                title: workout.title.clone(),
                description: workout.description.clone(),
                duration_minutes: workout.duration_minutes,
                calories_burned: workout.calories_burned,
                entries: workout.entries.iter().map(WorkoutEntryData::from).collect(),
                created_at: workout.created_at,
                updated_at: workout.updated_at,
            },
        }
    }
}
