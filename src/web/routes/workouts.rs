use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::workout_service::{self, LogWorkoutInput};
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedMember;

pub async fn log_workout_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(program_id): Path<String>,
    State(state): State<AppState>,
    Json(input): Json<LogWorkoutInput>,
) -> Result<Json<Value>, AppError> {
    let workout_id =
        workout_service::log_workout(&state.pool, &auth.id, &program_id, &input).await?;
    Ok(Json(json!({ "workout_id": workout_id })))
}

pub async fn list_workouts_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(program_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let workouts = workout_service::list_workouts(&state.pool, &auth.id, &program_id).await?;
    Ok(Json(json!({ "workouts": workouts })))
}
