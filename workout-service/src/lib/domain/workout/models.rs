use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::UserId;
use crate::domain::workout::errors::WorkoutValidationError;

/// Workout aggregate entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    /// Sorted by `order_index`.
    pub entries: Vec<WorkoutEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkoutId(pub i64);

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How an exercise is counted: repetitions or time under work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseMeasure {
    Reps(i32),
    DurationSeconds(i32),
}

impl ExerciseMeasure {
    /// Build from the two nullable wire fields; exactly one must be present.
    pub fn from_parts(
        index: usize,
        reps: Option<i32>,
        duration_seconds: Option<i32>,
    ) -> Result<Self, WorkoutValidationError> {
        match (reps, duration_seconds) {
            (Some(reps), None) => Ok(ExerciseMeasure::Reps(reps)),
            (None, Some(seconds)) => Ok(ExerciseMeasure::DurationSeconds(seconds)),
            _ => Err(WorkoutValidationError::RepsOrDuration { index }),
        }
    }

    pub fn reps(&self) -> Option<i32> {
        match self {
            ExerciseMeasure::Reps(reps) => Some(*reps),
            ExerciseMeasure::DurationSeconds(_) => None,
        }
    }

    pub fn duration_seconds(&self) -> Option<i32> {
        match self {
            ExerciseMeasure::Reps(_) => None,
            ExerciseMeasure::DurationSeconds(seconds) => Some(*seconds),
        }
    }
}

/// Persisted exercise line of a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutEntry {
    pub id: i64,
    pub exercise_name: String,
    pub sets: i32,
    pub measure: ExerciseMeasure,
    pub weight: Option<f64>,
    pub notes: String,
    pub order_index: i32,
}

/// Validated exercise line not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutEntry {
    pub exercise_name: String,
    pub sets: i32,
    pub measure: ExerciseMeasure,
    pub weight: Option<f64>,
    pub notes: String,
    pub order_index: i32,
}

impl NewWorkoutEntry {
    /// Validate an entry at position `index` of the submitted list.
    ///
    /// # Errors
    /// * `EmptyExerciseName` - Name is blank
    /// * `NonPositiveSets` - `sets` is zero or negative
    pub fn new(
        index: usize,
        exercise_name: String,
        sets: i32,
        measure: ExerciseMeasure,
        weight: Option<f64>,
        notes: String,
        order_index: i32,
    ) -> Result<Self, WorkoutValidationError> {
        if exercise_name.trim().is_empty() {
            return Err(WorkoutValidationError::EmptyExerciseName { index });
        }
        if sets <= 0 {
            return Err(WorkoutValidationError::NonPositiveSets { index });
        }

        Ok(Self {
            exercise_name,
            sets,
            measure,
            weight,
            notes,
            order_index,
        })
    }
}

impl From<WorkoutEntry> for NewWorkoutEntry {
    fn from(entry: WorkoutEntry) -> Self {
        Self {
            exercise_name: entry.exercise_name,
            sets: entry.sets,
            measure: entry.measure,
            weight: entry.weight,
            notes: entry.notes,
            order_index: entry.order_index,
        }
    }
}

/// Complete set of user-editable workout fields, validated.
///
/// Used both for creation and as the merged result of a partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub entries: Vec<NewWorkoutEntry>,
}

impl WorkoutDraft {
    /// # Errors
    /// * `EmptyTitle` - Title is blank
    /// * `NegativeDuration` / `NegativeCalories` - Totals below zero
    pub fn new(
        title: String,
        description: String,
        duration_minutes: i32,
        calories_burned: i32,
        entries: Vec<NewWorkoutEntry>,
    ) -> Result<Self, WorkoutValidationError> {
        if title.trim().is_empty() {
            return Err(WorkoutValidationError::EmptyTitle);
        }
        if duration_minutes < 0 {
            return Err(WorkoutValidationError::NegativeDuration);
        }
        if calories_burned < 0 {
            return Err(WorkoutValidationError::NegativeCalories);
        }

        Ok(Self {
            title,
            description,
            duration_minutes,
            calories_burned,
            entries,
        })
    }
}

/// Partial update; `None` keeps the stored value.
///
/// `entries`, when present, replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateWorkoutCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
    pub entries: Option<Vec<NewWorkoutEntry>>,
}

impl UpdateWorkoutCommand {
    /// Merge onto the current state and revalidate the result.
    pub fn apply_to(self, current: Workout) -> Result<WorkoutDraft, WorkoutValidationError> {
        let entries = match self.entries {
            Some(entries) => entries,
            None => current.entries.into_iter().map(NewWorkoutEntry::from).collect(),
        };

        WorkoutDraft::new(
            self.title.unwrap_or(current.title),
            self.description.unwrap_or(current.description),
            self.duration_minutes.unwrap_or(current.duration_minutes),
            self.calories_burned.unwrap_or(current.calories_burned),
            entries,
        )
    }
}
