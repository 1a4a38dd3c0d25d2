use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::health_service::{self, DailyLogInput};
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedMember;

pub async fn upsert_health_log_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    State(state): State<AppState>,
    Json(input): Json<DailyLogInput>,
) -> Result<Json<Value>, AppError> {
    health_service::upsert_daily_log(&state.pool, &auth.id, &input).await?;
    Ok(Json(json!({ "saved": true })))
}

#[derive(Debug, Deserialize, Default)]
pub struct HealthLogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn list_health_logs_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Query(query): Query<HealthLogQuery>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let logs = health_service::list_logs(
        &state.pool,
        &auth.id,
        query.from.as_deref(),
        query.to.as_deref(),
    )
    .await?;
    Ok(Json(json!({ "health_logs": logs })))
}
