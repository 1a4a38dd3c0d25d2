use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::database::{
    invite_commands_repo, member_commands_repo, member_repo, membership_commands_repo,
    membership_repo, notification_commands_repo, program_repo,
};
use crate::error::AppError;
use crate::live::LiveRegistry;
use crate::services::exit_service::{self, ExitContext, ExitOutcome};
use crate::services::notify_service::{self, DispatchQueue, NewNotification};

/// Voluntary exit from one program. The whole operation is a single
/// transaction; queued live pushes go out only after it commits.
pub async fn leave_program(
    pool: &SqlitePool,
    live: &LiveRegistry,
    program_id: &str,
    member_id: &str,
) -> Result<ExitOutcome, AppError> {
    let mut tx = pool.begin().await?;

    if membership_repo::load_active(&mut tx, program_id, member_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }
    membership_commands_repo::set_status(&mut tx, program_id, member_id, "left").await?;

    let mut queue = DispatchQueue::new();
    let outcome = exit_service::resolve_exit(
        &mut tx,
        &mut queue,
        program_id,
        member_id,
        &ExitContext {
            update_created_by: false,
            actor_member_id: Some(member_id.to_string()),
            include_exiting_member: true,
        },
    )
    .await?;

    if outcome != ExitOutcome::Deleted {
        notify_member_left(&mut tx, &mut queue, program_id, member_id, Some(member_id)).await?;
    }

    tx.commit().await?;
    queue.flush(live);
    Ok(outcome)
}

/// Self-service account deletion. Global admins cannot delete themselves.
pub async fn delete_account(
    pool: &SqlitePool,
    live: &LiveRegistry,
    member_id: &str,
    global_role: &str,
) -> Result<(), AppError> {
    if global_role == "global_admin" {
        return Err(AppError::Forbidden("global admins cannot delete their own account"));
    }
    delete_member(pool, live, member_id).await
}

/// Global-admin removal of another member's account.
pub async fn remove_member(
    pool: &SqlitePool,
    live: &LiveRegistry,
    target_member_id: &str,
    acting_member_id: &str,
) -> Result<(), AppError> {
    if target_member_id == acting_member_id {
        return Err(AppError::Invalid("use account deletion to remove yourself"));
    }
    let Some(target) = member_repo::load_member(pool, target_member_id).await? else {
        return Err(AppError::NotFound);
    };
    if target.global_role == "global_admin" {
        return Err(AppError::Forbidden("global admin accounts cannot be removed"));
    }
    delete_member(pool, live, target_member_id).await
}

/// Shared removal flow: scrub invites and actor notifications, resolve the
/// exit for every program the member touches, then drop the member row and
/// let the schema's cascades take the dependent rows.
async fn delete_member(
    pool: &SqlitePool,
    live: &LiveRegistry,
    member_id: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let Some(member) = member_repo::load_member_tx(&mut tx, member_id).await? else {
        return Err(AppError::NotFound);
    };

    // Free-text notification bodies may name the member; purge before the
    // row disappears. Recipient rows cascade with the notifications.
    invite_commands_repo::purge_for_member(&mut tx, member_id).await?;
    notification_commands_repo::purge_by_actor(&mut tx, member_id).await?;

    let touched = program_repo::touched_by_member(&mut tx, member_id).await?;
    let mut queue = DispatchQueue::new();
    for program_id in &touched {
        let was_active_member = membership_repo::load_active(&mut tx, program_id, member_id)
            .await?
            .is_some();

        let outcome = exit_service::resolve_exit(
            &mut tx,
            &mut queue,
            program_id,
            member_id,
            &ExitContext {
                update_created_by: true,
                actor_member_id: None,
                include_exiting_member: false,
            },
        )
        .await?;

        if was_active_member && outcome != ExitOutcome::Deleted {
            notify_member_left(&mut tx, &mut queue, program_id, member_id, None).await?;
        }
    }

    member_commands_repo::delete_member(&mut tx, &member.member_id).await?;

    tx.commit().await?;
    queue.flush(live);
    Ok(())
}

/// Informs a surviving program's remaining active members that someone left.
async fn notify_member_left(
    tx: &mut Transaction<'_, Sqlite>,
    queue: &mut DispatchQueue,
    program_id: &str,
    exited_member_id: &str,
    actor_member_id: Option<&str>,
) -> sqlx::Result<()> {
    let Some(program) = program_repo::load_program_tx(&mut *tx, program_id).await? else {
        return Ok(());
    };
    let username = member_repo::load_username_tx(&mut *tx, exited_member_id)
        .await?
        .unwrap_or_else(|| "a member".to_string());
    let recipients =
        membership_repo::active_member_ids_excluding(&mut *tx, program_id, exited_member_id)
            .await?;

    notify_service::notify(
        tx,
        queue,
        NewNotification {
            kind: "program.member_left",
            program_id: Some(program_id),
            actor_member_id,
            title: "Member left",
            body: &format!("{} left {}", username, program.name),
        },
        &recipients,
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::services::fixtures;
    use sqlx::SqlitePool;

    async fn count(pool: &SqlitePool, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
    }

    #[tokio::test]
    async fn leaving_a_surviving_program_notifies_the_rest() {
        let pool = test_pool().await;
        let live = LiveRegistry::new();
        fixtures::seed_program_with_members(
            &pool,
            "p1",
            &[("ma", "admin", "2026-01-01"), ("mb", "member", "2026-02-01")],
        )
        .await;

        let (_, mut rx) = live.register("mb");

        let outcome = leave_program(&pool, &live, "p1", "ma").await.unwrap();
        assert_eq!(
            outcome,
            ExitOutcome::Promoted {
                new_admin_member_id: "mb".to_string()
            }
        );

        assert_eq!(
            fixtures::recipients_of_kind(&pool, "program.member_left").await,
            vec!["mb".to_string()]
        );

        // Commit happened, so the live pushes went out: promotion, admin
        // transfer and the departure notice all target mb.
        let mut kinds = Vec::new();
        while let Ok(p) = rx.try_recv() {
            kinds.push(p.kind);
        }
        kinds.sort();
        assert_eq!(
            kinds,
            vec![
                "program.admin_transferred".to_string(),
                "program.member_left".to_string(),
                "program.role_changed".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn leaving_without_an_active_membership_is_not_found() {
        let pool = test_pool().await;
        let live = LiveRegistry::new();
        fixtures::seed_program_with_members(&pool, "p1", &[("ma", "admin", "2026-01-01")]).await;
        fixtures::seed_member(&pool, "mx").await;

        let err = leave_program(&pool, &live, "p1", "mx").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn account_deletion_resolves_every_touched_program() {
        let pool = test_pool().await;
        let live = LiveRegistry::new();

        // Q: the member is the sole active member (and creator).
        fixtures::seed_program_with_members(&pool, "q", &[("mm", "admin", "2026-01-01")]).await;
        // R: the member participates, another admin stays behind.
        fixtures::seed_program_with_members(
            &pool,
            "r",
            &[("ma2", "admin", "2026-01-01"), ("mm", "member", "2026-02-01")],
        )
        .await;

        // Pre-existing traces of the member: a sent invite and a caused
        // notification.
        fixtures::seed_invite(&pool, "inv1", "r", "mm", "friend@example.com").await;
        fixtures::seed_notification(&pool, "n-old", "program.member_left", "mm", &["ma2"]).await;

        delete_account(&pool, &live, "mm", "standard").await.unwrap();

        assert_eq!(count(&pool, "SELECT COUNT(*) FROM members WHERE member_id = 'mm'").await, 0);
        assert_eq!(
            count(&pool, "SELECT is_deleted FROM programs WHERE program_id = 'q'").await,
            1
        );
        assert_eq!(
            count(&pool, "SELECT is_deleted FROM programs WHERE program_id = 'r'").await,
            0
        );

        // R keeps its admin untouched and hears about the departure.
        let role: String = sqlx::query_scalar(
            "SELECT role FROM program_memberships WHERE program_id = 'r' AND member_id = 'ma2'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(role, "admin");
        assert_eq!(
            fixtures::recipients_of_kind(&pool, "program.member_left").await,
            vec!["ma2".to_string()]
        );

        // Memberships cascaded, invites and actor notifications purged.
        assert_eq!(
            count(&pool, "SELECT COUNT(*) FROM program_memberships WHERE member_id = 'mm'").await,
            0
        );
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM program_invites").await, 0);
        assert_eq!(
            count(&pool, "SELECT COUNT(*) FROM notifications WHERE notification_id = 'n-old'")
                .await,
            0
        );
    }

    #[tokio::test]
    async fn account_deletion_clears_created_by_on_surviving_programs() {
        let pool = test_pool().await;
        let live = LiveRegistry::new();
        fixtures::seed_program_with_members(
            &pool,
            "p1",
            &[("mm", "admin", "2026-01-01"), ("mb", "admin", "2026-02-01")],
        )
        .await;

        delete_account(&pool, &live, "mm", "standard").await.unwrap();

        let created_by: Option<String> =
            sqlx::query_scalar("SELECT created_by FROM programs WHERE program_id = 'p1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(created_by.is_none());
    }

    #[tokio::test]
    async fn global_admins_cannot_delete_their_own_account() {
        let pool = test_pool().await;
        let live = LiveRegistry::new();
        fixtures::seed_member(&pool, "boss").await;

        let err = delete_account(&pool, &live, "boss", "global_admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn removal_spares_global_admin_targets() {
        let pool = test_pool().await;
        let live = LiveRegistry::new();
        fixtures::seed_member_with_role(&pool, "boss", "global_admin").await;
        fixtures::seed_member(&pool, "acting").await;

        let err = remove_member(&pool, &live, "boss", "acting").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn removal_of_a_standard_member_succeeds() {
        let pool = test_pool().await;
        let live = LiveRegistry::new();
        fixtures::seed_member(&pool, "acting").await;
        fixtures::seed_program_with_members(&pool, "p1", &[("mm", "admin", "2026-01-01")]).await;

        remove_member(&pool, &live, "mm", "acting").await.unwrap();

        assert_eq!(count(&pool, "SELECT COUNT(*) FROM members WHERE member_id = 'mm'").await, 0);
        assert_eq!(
            count(&pool, "SELECT is_deleted FROM programs WHERE program_id = 'p1'").await,
            1
        );
    }
}
