use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{membership_repo, workout_repo};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct LogWorkoutInput {
    pub performed_at: String,
    pub activity: String,
    pub duration_min: i64,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct WorkoutView {
    pub workout_id: String,
    pub program_id: String,
    pub performed_at: String,
    pub activity: String,
    pub duration_min: i64,
    pub notes: Option<String>,
}

/// Logs a workout against a program the member is active in.
pub async fn log_workout(
    pool: &SqlitePool,
    member_id: &str,
    program_id: &str,
    input: &LogWorkoutInput,
) -> Result<String, AppError> {
    let activity = input.activity.trim();
    if activity.is_empty() {
        return Err(AppError::Invalid("activity is required"));
    }
    if input.duration_min <= 0 {
        return Err(AppError::Invalid("duration_min must be positive"));
    }
    if membership_repo::load_active_pool(pool, program_id, member_id)
        .await?
        .is_none()
    {
        return Err(AppError::Forbidden("not an active member of this program"));
    }

    let workout_id = Uuid::new_v4().to_string();
    workout_repo::insert_workout(
        pool,
        workout_repo::NewWorkout {
            workout_id: &workout_id,
            member_id,
            program_id,
            performed_at: &input.performed_at,
            activity,
            duration_min: input.duration_min,
            notes: input.notes.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        },
    )
    .await?;
    Ok(workout_id)
}

pub async fn list_workouts(
    pool: &SqlitePool,
    member_id: &str,
    program_id: &str,
) -> sqlx::Result<Vec<WorkoutView>> {
    let rows = workout_repo::list_for_member(pool, member_id, program_id, 200).await?;
    Ok(rows
        .into_iter()
        .map(|w| WorkoutView {
            workout_id: w.workout_id,
            program_id: w.program_id,
            performed_at: w.performed_at,
            activity: w.activity,
            duration_min: w.duration_min,
            notes: w.notes,
        })
        .collect())
}
