use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::{member_commands_repo, member_repo};
use crate::error::AppError;

#[derive(Serialize)]
pub struct MemberProfileView {
    pub member_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub global_role: String,
    pub emails: Vec<String>,
    pub created_at: String,
}

pub async fn load_profile(
    pool: &SqlitePool,
    member_id: &str,
) -> Result<MemberProfileView, AppError> {
    let Some(member) = member_repo::load_member(pool, member_id).await? else {
        return Err(AppError::NotFound);
    };
    let emails = member_repo::list_emails(pool, member_id).await?;

    Ok(MemberProfileView {
        member_id: member.member_id,
        username: member.username,
        display_name: member.display_name,
        global_role: member.global_role,
        emails,
        created_at: member.created_at,
    })
}

pub async fn add_email(pool: &SqlitePool, member_id: &str, email: &str) -> Result<(), AppError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Invalid("a valid email is required"));
    }
    member_commands_repo::add_email(pool, member_id, &email).await?;
    Ok(())
}
