#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutRow {
    pub workout_id: String,
    pub member_id: String,
    pub program_id: String,
    pub performed_at: String,
    pub activity: String,
    pub duration_min: i64,
    pub notes: Option<String>,
    pub created_at: String,
}
