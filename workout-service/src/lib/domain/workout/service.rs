use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::UserId;
use crate::domain::workout::errors::WorkoutError;
use crate::domain::workout::models::UpdateWorkoutCommand;
use crate::domain::workout::models::Workout;
use crate::domain::workout::models::WorkoutDraft;
use crate::domain::workout::models::WorkoutId;
use crate::domain::workout::ports::WorkoutRepository;
use crate::domain::workout::ports::WorkoutServicePort;

/// Domain service implementation for workout operations.
pub struct WorkoutService<WR>
where
    WR: WorkoutRepository,
{
    repository: Arc<WR>,
}

impl<WR> WorkoutService<WR>
where
    WR: WorkoutRepository,
{
    pub fn new(repository: Arc<WR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<WR> WorkoutServicePort for WorkoutService<WR>
where
    WR: WorkoutRepository,
{
    async fn create_workout(
        &self,
        owner: UserId,
        draft: WorkoutDraft,
    ) -> Result<Workout, WorkoutError> {
        let workout = self.repository.create(owner, draft).await?;

        tracing::info!(
            workout_id = %workout.id,
            user_id = %owner,
            entries = workout.entries.len(),
            "Workout created"
        );

        Ok(workout)
    }

    async fn get_workout(&self, id: WorkoutId) -> Result<Workout, WorkoutError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(WorkoutError::NotFound(id.0))
    }

    async fn get_workout_owner(&self, id: WorkoutId) -> Result<UserId, WorkoutError> {
        self.repository
            .find_owner(id)
            .await?
            .ok_or(WorkoutError::NotFound(id.0))
    }

    async fn update_workout(
        &self,
        id: WorkoutId,
        command: UpdateWorkoutCommand,
    ) -> Result<Workout, WorkoutError> {
        let current = self.get_workout(id).await?;
        let draft = command.apply_to(current)?;

        let workout = self
            .repository
            .update(id, draft)
            .await?
            // Deleted between read and write
            .ok_or(WorkoutError::NotFound(id.0))?;

        tracing::info!(workout_id = %id, "Workout updated");
        Ok(workout)
    }

    async fn delete_workout(&self, id: WorkoutId) -> Result<(), WorkoutError> {
        if !self.repository.delete(id).await? {
            return Err(WorkoutError::NotFound(id.0));
        }

        tracing::info!(workout_id = %id, "Workout deleted");
        Ok(())
    }
}
