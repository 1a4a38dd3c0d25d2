#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HealthLogRow {
    pub member_id: String,
    pub log_date: String,
    pub weight_kg: Option<f64>,
    pub resting_heart_rate: Option<i64>,
    pub sleep_hours: Option<f64>,
    pub mood: Option<String>,
}
