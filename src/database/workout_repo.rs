use sqlx::SqlitePool;

use crate::models::WorkoutRow;

pub struct NewWorkout<'a> {
    pub workout_id: &'a str,
    pub member_id: &'a str,
    pub program_id: &'a str,
    pub performed_at: &'a str,
    pub activity: &'a str,
    pub duration_min: i64,
    pub notes: Option<&'a str>,
}

const SQL_INSERT_WORKOUT: &str = r#"
INSERT INTO workouts (
  workout_id,
  member_id,
  program_id,
  performed_at,
  activity,
  duration_min,
  notes
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub async fn insert_workout(pool: &SqlitePool, w: NewWorkout<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_WORKOUT)
        .bind(w.workout_id)
        .bind(w.member_id)
        .bind(w.program_id)
        .bind(w.performed_at)
        .bind(w.activity)
        .bind(w.duration_min)
        .bind(w.notes)
        .execute(pool)
        .await?;
    Ok(())
}

const SQL_LIST_FOR_MEMBER: &str = r#"
SELECT
  workout_id,
  member_id,
  program_id,
  performed_at,
  activity,
  duration_min,
  notes,
  created_at
FROM workouts
WHERE member_id = ?1
  AND program_id = ?2
ORDER BY performed_at DESC, workout_id ASC
LIMIT ?3
"#;

pub async fn list_for_member(
    pool: &SqlitePool,
    member_id: &str,
    program_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<WorkoutRow>> {
    sqlx::query_as::<_, WorkoutRow>(SQL_LIST_FOR_MEMBER)
        .bind(member_id)
        .bind(program_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}
