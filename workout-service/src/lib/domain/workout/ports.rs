use async_trait::async_trait;

use crate::domain::user::models::UserId;
use crate::domain::workout::errors::WorkoutError;
use crate::domain::workout::models::UpdateWorkoutCommand;
use crate::domain::workout::models::Workout;
use crate::domain::workout::models::WorkoutDraft;
use crate::domain::workout::models::WorkoutId;

/// Port for workout domain service operations.
#[async_trait]
pub trait WorkoutServicePort: Send + Sync + 'static {
    /// Store a new workout owned by `owner`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_workout(
        &self,
        owner: UserId,
        draft: WorkoutDraft,
    ) -> Result<Workout, WorkoutError>;

    /// Retrieve a workout with its entries.
    ///
    /// # Errors
    /// * `NotFound` - No workout with this id
    /// * `DatabaseError` - Database operation failed
    async fn get_workout(&self, id: WorkoutId) -> Result<Workout, WorkoutError>;

    /// Retrieve only the owning user id, for ownership checks.
    ///
    /// # Errors
    /// * `NotFound` - No workout with this id
    async fn get_workout_owner(&self, id: WorkoutId) -> Result<UserId, WorkoutError>;

    /// Apply a partial update.
    ///
    /// # Errors
    /// * `NotFound` - No workout with this id
    /// * `Invalid` - Merged workout fails validation
    /// * `DatabaseError` - Database operation failed
    async fn update_workout(
        &self,
        id: WorkoutId,
        command: UpdateWorkoutCommand,
    ) -> Result<Workout, WorkoutError>;

    /// Delete a workout and its entries.
    ///
    /// # Errors
    /// * `NotFound` - No workout with this id
    async fn delete_workout(&self, id: WorkoutId) -> Result<(), WorkoutError>;
}

/// Persistence operations for workout aggregate.
///
/// A workout and its entries are always written together.
#[async_trait]
pub trait WorkoutRepository: Send + Sync + 'static {
    async fn create(&self, owner: UserId, draft: WorkoutDraft) -> Result<Workout, WorkoutError>;

    async fn find_by_id(&self, id: WorkoutId) -> Result<Option<Workout>, WorkoutError>;

    async fn find_owner(&self, id: WorkoutId) -> Result<Option<UserId>, WorkoutError>;

    /// Overwrite all fields and replace the entry list.
    ///
    /// # Returns
    /// None if the workout does not exist
    async fn update(
        &self,
        id: WorkoutId,
        draft: WorkoutDraft,
    ) -> Result<Option<Workout>, WorkoutError>;

    /// # Returns
    /// Whether a workout was deleted
    async fn delete(&self, id: WorkoutId) -> Result<bool, WorkoutError>;
}
