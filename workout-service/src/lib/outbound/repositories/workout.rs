use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgConnection;
use sqlx::PgPool;

use crate::domain::user::models::UserId;
use crate::domain::workout::errors::WorkoutError;
use crate::domain::workout::models::ExerciseMeasure;
use crate::domain::workout::models::NewWorkoutEntry;
use crate::domain::workout::models::Workout;
use crate::domain::workout::models::WorkoutDraft;
use crate::domain::workout::models::WorkoutEntry;
use crate::domain::workout::models::WorkoutId;
use crate::domain::workout::ports::WorkoutRepository;

pub struct PostgresWorkoutRepository {
    pool: PgPool,
}

impl PostgresWorkoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct WorkoutRow {
    id: i64,
    user_id: i64,
    title: String,
    description: String,
    duration_minutes: i32,
    calories_burned: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkoutRow {
    fn into_workout(self, entries: Vec<WorkoutEntry>) -> Workout {
        Workout {
            id: WorkoutId(self.id),
            user_id: UserId(self.user_id),
            title: self.title,
            description: self.description,
            duration_minutes: self.duration_minutes,
            calories_burned: self.calories_burned,
            entries,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    exercise_name: String,
    sets: i32,
    reps: Option<i32>,
    duration_seconds: Option<i32>,
    weight: Option<f64>,
    notes: String,
    order_index: i32,
}

impl TryFrom<EntryRow> for WorkoutEntry {
    type Error = WorkoutError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let measure = ExerciseMeasure::from_parts(0, row.reps, row.duration_seconds)
            .map_err(|_| {
                WorkoutError::DatabaseError(format!(
                    "workout entry {} has both or neither of reps and duration_seconds",
                    row.id
                ))
            })?;

        Ok(WorkoutEntry {
            id: row.id,
            exercise_name: row.exercise_name,
            sets: row.sets,
            measure,
            weight: row.weight,
            notes: row.notes,
            order_index: row.order_index,
        })
    }
}

fn database_error(e: sqlx::Error) -> WorkoutError {
    WorkoutError::DatabaseError(e.to_string())
}

async fn insert_entries(
    conn: &mut PgConnection,
    workout_id: i64,
    entries: Vec<NewWorkoutEntry>,
) -> Result<Vec<WorkoutEntry>, WorkoutError> {
    let mut inserted = Vec::with_capacity(entries.len());

    for entry in entries {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO workout_entries
                (workout_id, exercise_name, sets, reps, duration_seconds, weight, notes, order_index)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(workout_id)
        .bind(&entry.exercise_name)
        .bind(entry.sets)
        .bind(entry.measure.reps())
        .bind(entry.measure.duration_seconds())
        .bind(entry.weight)
        .bind(&entry.notes)
        .bind(entry.order_index)
        .fetch_one(&mut *conn)
        .await
        .map_err(database_error)?;

        inserted.push(WorkoutEntry {
            id,
            exercise_name: entry.exercise_name,
            sets: entry.sets,
            measure: entry.measure,
            weight: entry.weight,
            notes: entry.notes,
            order_index: entry.order_index,
        });
    }

    inserted.sort_by_key(|entry| entry.order_index);
    Ok(inserted)
}

#[async_trait]
impl WorkoutRepository for PostgresWorkoutRepository {
    async fn create(&self, owner: UserId, draft: WorkoutDraft) -> Result<Workout, WorkoutError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let row = sqlx::query_as::<_, WorkoutRow>(
            r#"
            INSERT INTO workouts (user_id, title, description, duration_minutes, calories_burned)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, duration_minutes, calories_burned,
                      created_at, updated_at
            "#,
        )
        .bind(owner.0)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.duration_minutes)
        .bind(draft.calories_burned)
        .fetch_one(&mut *tx)
        .await
        .map_err(database_error)?;

        let entries = insert_entries(&mut *tx, row.id, draft.entries).await?;
        tx.commit().await.map_err(database_error)?;

        Ok(row.into_workout(entries))
    }

    async fn find_by_id(&self, id: WorkoutId) -> Result<Option<Workout>, WorkoutError> {
        let Some(row) = sqlx::query_as::<_, WorkoutRow>(
            r#"
            SELECT id, user_id, title, description, duration_minutes, calories_burned,
                   created_at, updated_at
            FROM workouts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        else {
            return Ok(None);
        };

        let entries = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, exercise_name, sets, reps, duration_seconds, weight, notes, order_index
            FROM workout_entries
            WHERE workout_id = $1
            ORDER BY order_index, id
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(WorkoutEntry::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(row.into_workout(entries)))
    }

    async fn find_owner(&self, id: WorkoutId) -> Result<Option<UserId>, WorkoutError> {
        let owner: Option<i64> = sqlx::query_scalar("SELECT user_id FROM workouts WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(owner.map(UserId))
    }

    async fn update(
        &self,
        id: WorkoutId,
        draft: WorkoutDraft,
    ) -> Result<Option<Workout>, WorkoutError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let Some(row) = sqlx::query_as::<_, WorkoutRow>(
            r#"
            UPDATE workouts
            SET title = $2, description = $3, duration_minutes = $4, calories_burned = $5,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING id, user_id, title, description, duration_minutes, calories_burned,
                      created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.duration_minutes)
        .bind(draft.calories_burned)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM workout_entries WHERE workout_id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        let entries = insert_entries(&mut *tx, row.id, draft.entries).await?;
        tx.commit().await.map_err(database_error)?;

        Ok(Some(row.into_workout(entries)))
    }

    async fn delete(&self, id: WorkoutId) -> Result<bool, WorkoutError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}
