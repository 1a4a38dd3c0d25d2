use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::lifecycle_service;
use crate::services::program_service::{self, CreateProgramInput};
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedMember;

pub async fn create_program_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    State(state): State<AppState>,
    Json(input): Json<CreateProgramInput>,
) -> Result<Json<Value>, AppError> {
    let program_id = program_service::create_program(&state.pool, &auth.id, &input).await?;
    Ok(Json(json!({ "program_id": program_id })))
}

pub async fn list_programs_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let programs = program_service::list_my_programs(&state.pool, &auth.id).await?;
    Ok(Json(json!({ "programs": programs })))
}

pub async fn program_detail_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(program_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let detail = program_service::load_program_detail(&state.pool, &program_id, &auth.id).await?;
    Ok(Json(json!({ "program": detail })))
}

pub async fn join_program_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(program_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    program_service::join_program(&state.pool, &program_id, &auth.id).await?;
    Ok(Json(json!({ "joined": true })))
}

pub async fn leave_program_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(program_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let outcome =
        lifecycle_service::leave_program(&state.pool, &state.live, &program_id, &auth.id).await?;

    use crate::services::exit_service::ExitOutcome;
    let body = match outcome {
        ExitOutcome::Deleted => json!({ "left": true, "program_deleted": true }),
        ExitOutcome::Promoted { new_admin_member_id } => json!({
            "left": true,
            "program_deleted": false,
            "new_admin_member_id": new_admin_member_id,
        }),
        ExitOutcome::Unchanged => json!({ "left": true, "program_deleted": false }),
    };
    Ok(Json(body))
}
