use thiserror::Error;

/// Error for workout field validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkoutValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("duration_minutes must not be negative")]
    NegativeDuration,

    #[error("calories_burned must not be negative")]
    NegativeCalories,

    #[error("entry {index}: exercise_name must not be empty")]
    EmptyExerciseName { index: usize },

    #[error("entry {index}: sets must be greater than zero")]
    NonPositiveSets { index: usize },

    #[error("entry {index}: exactly one of reps or duration_seconds must be set")]
    RepsOrDuration { index: usize },
}

/// Top-level error for all workout-related operations
#[derive(Debug, Clone, Error)]
pub enum WorkoutError {
    #[error("Invalid workout: {0}")]
    Invalid(#[from] WorkoutValidationError),

    #[error("Workout not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for WorkoutError {
    fn from(err: anyhow::Error) -> Self {
        WorkoutError::Unknown(err.to_string())
    }
}
