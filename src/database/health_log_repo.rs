use sqlx::SqlitePool;

use crate::models::HealthLogRow;

pub struct DailyHealthLog<'a> {
    pub member_id: &'a str,
    pub log_date: &'a str,
    pub weight_kg: Option<f64>,
    pub resting_heart_rate: Option<i64>,
    pub sleep_hours: Option<f64>,
    pub mood: Option<&'a str>,
}

// One row per (member, day); a second submission for the same day replaces
// the first.
const SQL_UPSERT_LOG: &str = r#"
INSERT INTO health_logs (
  member_id,
  log_date,
  weight_kg,
  resting_heart_rate,
  sleep_hours,
  mood,
  updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, strftime('%Y-%m-%dT%H:%M:%f', 'now'))
ON CONFLICT (member_id, log_date) DO UPDATE SET
  weight_kg = excluded.weight_kg,
  resting_heart_rate = excluded.resting_heart_rate,
  sleep_hours = excluded.sleep_hours,
  mood = excluded.mood,
  updated_at = excluded.updated_at
"#;

pub async fn upsert_log(pool: &SqlitePool, log: DailyHealthLog<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_UPSERT_LOG)
        .bind(log.member_id)
        .bind(log.log_date)
        .bind(log.weight_kg)
        .bind(log.resting_heart_rate)
        .bind(log.sleep_hours)
        .bind(log.mood)
        .execute(pool)
        .await?;
    Ok(())
}

const SQL_LIST_RANGE: &str = r#"
SELECT
  member_id,
  log_date,
  weight_kg,
  resting_heart_rate,
  sleep_hours,
  mood
FROM health_logs
WHERE member_id = ?1
  AND (?2 = '' OR log_date >= ?2)
  AND (?3 = '' OR log_date <= ?3)
ORDER BY log_date ASC
"#;

pub async fn list_range(
    pool: &SqlitePool,
    member_id: &str,
    from: &str,
    to: &str,
) -> sqlx::Result<Vec<HealthLogRow>> {
    sqlx::query_as::<_, HealthLogRow>(SQL_LIST_RANGE)
        .bind(member_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
}
