use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::database::health_log_repo;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct DailyLogInput {
    pub log_date: String,
    pub weight_kg: Option<f64>,
    pub resting_heart_rate: Option<i64>,
    pub sleep_hours: Option<f64>,
    pub mood: Option<String>,
}

#[derive(Serialize)]
pub struct HealthLogView {
    pub log_date: String,
    pub weight_kg: Option<f64>,
    pub resting_heart_rate: Option<i64>,
    pub sleep_hours: Option<f64>,
    pub mood: Option<String>,
}

fn is_ymd(date: &str) -> bool {
    let mut parts = date.split('-');
    let ok = |s: Option<&str>, len: usize| {
        s.map(|p| p.len() == len && p.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    };
    ok(parts.next(), 4) && ok(parts.next(), 2) && ok(parts.next(), 2) && parts.next().is_none()
}

/// Stores the member's metrics for one day; resubmitting the same day
/// overwrites.
pub async fn upsert_daily_log(
    pool: &SqlitePool,
    member_id: &str,
    input: &DailyLogInput,
) -> Result<(), AppError> {
    if !is_ymd(&input.log_date) {
        return Err(AppError::Invalid("log_date must be YYYY-MM-DD"));
    }
    if let Some(w) = input.weight_kg {
        if !(20.0..500.0).contains(&w) {
            return Err(AppError::Invalid("weight_kg out of range"));
        }
    }
    if let Some(hr) = input.resting_heart_rate {
        if !(20..260).contains(&hr) {
            return Err(AppError::Invalid("resting_heart_rate out of range"));
        }
    }

    health_log_repo::upsert_log(
        pool,
        health_log_repo::DailyHealthLog {
            member_id,
            log_date: &input.log_date,
            weight_kg: input.weight_kg,
            resting_heart_rate: input.resting_heart_rate,
            sleep_hours: input.sleep_hours,
            mood: input.mood.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        },
    )
    .await?;
    Ok(())
}

pub async fn list_logs(
    pool: &SqlitePool,
    member_id: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> sqlx::Result<Vec<HealthLogView>> {
    let rows =
        health_log_repo::list_range(pool, member_id, from.unwrap_or(""), to.unwrap_or("")).await?;
    Ok(rows
        .into_iter()
        .map(|r| HealthLogView {
            log_date: r.log_date,
            weight_kg: r.weight_kg,
            resting_heart_rate: r.resting_heart_rate,
            sleep_hours: r.sleep_hours,
            mood: r.mood,
        })
        .collect())
}
