use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::invite_service;
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedMember;

#[derive(Debug, Deserialize)]
pub struct CreateInviteBody {
    pub email: String,
}

pub async fn create_invite_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(program_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<CreateInviteBody>,
) -> Result<Json<Value>, AppError> {
    let invite_id =
        invite_service::create_invite(&state.pool, &program_id, &auth.id, &body.email).await?;
    Ok(Json(json!({ "invite_id": invite_id })))
}

pub async fn list_invites_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(program_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let invites = invite_service::list_invites(&state.pool, &program_id, &auth.id).await?;
    Ok(Json(json!({ "invites": invites })))
}

pub async fn accept_invite_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(invite_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let program_id = invite_service::accept_invite(&state.pool, &invite_id, &auth.id).await?;
    Ok(Json(json!({ "accepted": true, "program_id": program_id })))
}
