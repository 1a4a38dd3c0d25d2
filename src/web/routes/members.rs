use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::{lifecycle_service, member_service};
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedMember;

pub async fn me_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let profile = member_service::load_profile(&state.pool, &auth.id).await?;
    Ok(Json(json!({ "member": profile })))
}

#[derive(Debug, Deserialize)]
pub struct AddEmailBody {
    pub email: String,
}

pub async fn add_email_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    State(state): State<AppState>,
    Json(body): Json<AddEmailBody>,
) -> Result<Json<Value>, AppError> {
    member_service::add_email(&state.pool, &auth.id, &body.email).await?;
    Ok(Json(json!({ "added": true })))
}

pub async fn delete_account_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    lifecycle_service::delete_account(&state.pool, &state.live, &auth.id, &auth.global_role)
        .await?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn remove_member_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(member_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    if !auth.is_global_admin() {
        return Err(AppError::Forbidden("global admin role required"));
    }
    lifecycle_service::remove_member(&state.pool, &state.live, &member_id, &auth.id).await?;
    Ok(Json(json!({ "removed": true })))
}
