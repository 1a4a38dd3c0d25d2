use sqlx::{Sqlite, Transaction};

use crate::database::{
    member_repo, membership_commands_repo, membership_repo, program_commands_repo, program_repo,
};
use crate::services::notify_service::{self, DispatchQueue, NewNotification};

/// How the exit should be applied. `actor_member_id` is attributed on the
/// `program.deleted` event and must be None when the exiting member's row is
/// about to be removed. `include_exiting_member` widens the `program.deleted`
/// recipient set to the member who just left.
pub struct ExitContext {
    pub update_created_by: bool,
    pub actor_member_id: Option<String>,
    pub include_exiting_member: bool,
}

/// Program fate after one member's exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Deleted,
    Promoted { new_admin_member_id: String },
    Unchanged,
}

/// Resolves what happens to a program when one member stops participating:
/// soft-deletes the program when nobody active remains, otherwise promotes
/// the longest-standing active member when the last active admin is gone.
///
/// Runs entirely on the caller's transaction; notifications are queued on
/// `queue` and only reach live connections once the caller commits and
/// flushes. Calling this for a member who is not active in the program is
/// safe, since the counts already exclude the exiting member.
pub async fn resolve_exit(
    tx: &mut Transaction<'_, Sqlite>,
    queue: &mut DispatchQueue,
    program_id: &str,
    exiting_member_id: &str,
    ctx: &ExitContext,
) -> sqlx::Result<ExitOutcome> {
    let Some(program) = program_repo::load_program_tx(&mut *tx, program_id).await? else {
        return Ok(ExitOutcome::Unchanged);
    };
    if program.is_deleted != 0 {
        // Already resolved by an earlier exit.
        return Ok(ExitOutcome::Unchanged);
    }

    let remaining =
        membership_repo::count_active_excluding(&mut *tx, program_id, exiting_member_id).await?;

    if remaining == 0 {
        program_commands_repo::soft_delete(&mut *tx, program_id).await?;
        if ctx.update_created_by && program.created_by.as_deref() == Some(exiting_member_id) {
            program_commands_repo::clear_created_by(&mut *tx, program_id).await?;
        }

        let mut recipients =
            membership_repo::active_member_ids_excluding(&mut *tx, program_id, exiting_member_id)
                .await?;
        if ctx.include_exiting_member {
            recipients.push(exiting_member_id.to_string());
        }
        notify_service::notify(
            tx,
            queue,
            NewNotification {
                kind: "program.deleted",
                program_id: Some(program_id),
                actor_member_id: ctx.actor_member_id.as_deref(),
                title: "Program closed",
                body: &format!("{} was closed because no active members remain", program.name),
            },
            &recipients,
        )
        .await?;

        return Ok(ExitOutcome::Deleted);
    }

    let admins =
        membership_repo::count_active_admins_excluding(&mut *tx, program_id, exiting_member_id)
            .await?;

    let mut promoted: Option<String> = None;
    if admins == 0 {
        if let Some(candidate) =
            membership_repo::promotion_candidate(&mut *tx, program_id, exiting_member_id).await?
        {
            if candidate.role != "admin" {
                membership_commands_repo::set_role(
                    &mut *tx,
                    program_id,
                    &candidate.member_id,
                    "admin",
                )
                .await?;
                promoted = Some(candidate.member_id);
            }
        }
    }

    if let Some(new_admin_id) = promoted.as_deref() {
        let new_admin_name = member_repo::load_username_tx(&mut *tx, new_admin_id)
            .await?
            .unwrap_or_else(|| "a member".to_string());

        notify_service::notify(
            tx,
            queue,
            NewNotification {
                kind: "program.role_changed",
                program_id: Some(program_id),
                actor_member_id: Some(new_admin_id),
                title: "You are now an admin",
                body: &format!("You are now an admin of {}", program.name),
            },
            &[new_admin_id.to_string()],
        )
        .await?;

        let transfer_recipients =
            membership_repo::active_member_ids_excluding(&mut *tx, program_id, exiting_member_id)
                .await?;
        notify_service::notify(
            tx,
            queue,
            NewNotification {
                kind: "program.admin_transferred",
                program_id: Some(program_id),
                actor_member_id: Some(new_admin_id),
                title: "Admin changed",
                body: &format!("{} is now an admin of {}", new_admin_name, program.name),
            },
            &transfer_recipients,
        )
        .await?;
    }

    if ctx.update_created_by && program.created_by.as_deref() == Some(exiting_member_id) {
        // The program survives without a nominal owner.
        program_commands_repo::clear_created_by(&mut *tx, program_id).await?;
    }

    Ok(match promoted {
        Some(new_admin_member_id) => ExitOutcome::Promoted {
            new_admin_member_id,
        },
        None => ExitOutcome::Unchanged,
    })
}
