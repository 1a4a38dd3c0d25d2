use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{
    invite_commands_repo, invite_repo, member_repo, membership_commands_repo, membership_repo,
    program_repo,
};
use crate::error::AppError;
use crate::services::program_service;

#[derive(Serialize)]
pub struct InviteView {
    pub invite_id: String,
    pub program_id: String,
    pub email: String,
    pub status: String,
    pub created_at: String,
}

/// Program admins invite by email address; the invite is matched against the
/// accepting member's registered emails.
pub async fn create_invite(
    pool: &SqlitePool,
    program_id: &str,
    inviter_member_id: &str,
    email: &str,
) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Invalid("a valid email is required"));
    }

    let Some(program) = program_repo::load_program(pool, program_id).await? else {
        return Err(AppError::NotFound);
    };
    if program.is_deleted != 0 {
        return Err(AppError::NotFound);
    }
    if !program_service::is_program_admin(pool, program_id, inviter_member_id).await? {
        return Err(AppError::Forbidden("only program admins can invite"));
    }

    let invite_id = Uuid::new_v4().to_string();
    let mut tx = pool.begin().await?;
    invite_commands_repo::insert_invite(
        &mut tx,
        invite_commands_repo::NewProgramInvite {
            invite_id: &invite_id,
            program_id,
            inviter_member_id,
            email: &email,
        },
    )
    .await?;
    tx.commit().await?;

    Ok(invite_id)
}

pub async fn list_invites(
    pool: &SqlitePool,
    program_id: &str,
    viewer_member_id: &str,
) -> Result<Vec<InviteView>, AppError> {
    if !program_service::is_program_admin(pool, program_id, viewer_member_id).await? {
        return Err(AppError::Forbidden("only program admins can list invites"));
    }
    let rows = invite_repo::list_for_program(pool, program_id).await?;
    Ok(rows
        .into_iter()
        .map(|r| InviteView {
            invite_id: r.invite_id,
            program_id: r.program_id,
            email: r.email,
            status: r.status,
            created_at: r.created_at,
        })
        .collect())
}

/// Accepts a pending invite addressed to one of the member's emails, creating
/// or reactivating the membership in the same transaction.
pub async fn accept_invite(
    pool: &SqlitePool,
    invite_id: &str,
    member_id: &str,
) -> Result<String, AppError> {
    let mut tx = pool.begin().await?;

    let Some(invite) = invite_repo::load_pending(&mut tx, invite_id).await? else {
        return Err(AppError::NotFound);
    };
    if !member_repo::email_belongs_to(&mut tx, member_id, &invite.email).await? {
        return Err(AppError::Forbidden("invite was sent to a different email"));
    }

    let Some(program) = program_repo::load_program_tx(&mut tx, &invite.program_id).await? else {
        return Err(AppError::NotFound);
    };
    if program.is_deleted != 0 {
        return Err(AppError::NotFound);
    }

    match membership_repo::load_any(&mut tx, &invite.program_id, member_id).await? {
        Some(m) if m.status == "active" => {
            return Err(AppError::Conflict("already an active member"));
        }
        Some(_) => {
            membership_commands_repo::reactivate(&mut tx, &invite.program_id, member_id).await?;
        }
        None => {
            membership_commands_repo::insert_membership(
                &mut tx,
                &invite.program_id,
                member_id,
                "member",
            )
            .await?;
        }
    }
    invite_commands_repo::mark_accepted(&mut tx, invite_id).await?;

    tx.commit().await?;
    Ok(invite.program_id)
}
