pub mod exit_service;
pub mod health_service;
pub mod invite_service;
pub mod lifecycle_service;
pub mod member_service;
pub mod notification_feed_service;
pub mod notify_service;
pub mod program_service;
pub mod workout_service;

#[cfg(test)]
pub(crate) mod fixtures {
    use sqlx::SqlitePool;

    pub async fn seed_member(pool: &SqlitePool, member_id: &str) {
        seed_member_with_role(pool, member_id, "standard").await;
    }

    pub async fn seed_member_with_role(pool: &SqlitePool, member_id: &str, global_role: &str) {
        sqlx::query(
            "INSERT OR IGNORE INTO members (member_id, username, global_role) VALUES (?1, ?2, ?3)",
        )
        .bind(member_id)
        .bind(member_id)
        .bind(global_role)
        .execute(pool)
        .await
        .unwrap();
    }

    pub async fn seed_email(pool: &SqlitePool, member_id: &str, email: &str) {
        sqlx::query("INSERT OR IGNORE INTO member_emails (member_id, email) VALUES (?1, ?2)")
            .bind(member_id)
            .bind(email)
            .execute(pool)
            .await
            .unwrap();
    }

    /// Seeds a program owned by the first listed member, with one active
    /// membership per `(member_id, role, joined_at)` entry.
    pub async fn seed_program_with_members(
        pool: &SqlitePool,
        program_id: &str,
        members: &[(&str, &str, &str)],
    ) {
        let created_by = members.first().map(|(id, _, _)| *id);
        for (member_id, _, _) in members {
            seed_member(pool, member_id).await;
        }
        sqlx::query(
            "INSERT INTO programs (program_id, name, start_date, end_date, status, created_by)
             VALUES (?1, ?2, '2026-01-01', '2026-12-31', 'active', ?3)",
        )
        .bind(program_id)
        .bind(format!("Program {}", program_id))
        .bind(created_by)
        .execute(pool)
        .await
        .unwrap();

        for (member_id, role, joined_at) in members {
            sqlx::query(
                "INSERT INTO program_memberships (program_id, member_id, role, status, joined_at)
                 VALUES (?1, ?2, ?3, 'active', ?4)",
            )
            .bind(program_id)
            .bind(member_id)
            .bind(role)
            .bind(joined_at)
            .execute(pool)
            .await
            .unwrap();
        }
    }

    pub async fn seed_invite(
        pool: &SqlitePool,
        invite_id: &str,
        program_id: &str,
        inviter_member_id: &str,
        email: &str,
    ) {
        sqlx::query(
            "INSERT INTO program_invites (invite_id, program_id, inviter_member_id, email, status)
             VALUES (?1, ?2, ?3, ?4, 'pending')",
        )
        .bind(invite_id)
        .bind(program_id)
        .bind(inviter_member_id)
        .bind(email)
        .execute(pool)
        .await
        .unwrap();
    }

    pub async fn seed_notification(
        pool: &SqlitePool,
        notification_id: &str,
        kind: &str,
        actor_member_id: &str,
        recipient_ids: &[&str],
    ) {
        sqlx::query(
            "INSERT INTO notifications (notification_id, kind, actor_member_id, title, body)
             VALUES (?1, ?2, ?3, 'seed', 'seed')",
        )
        .bind(notification_id)
        .bind(kind)
        .bind(actor_member_id)
        .execute(pool)
        .await
        .unwrap();
        for member_id in recipient_ids {
            sqlx::query(
                "INSERT INTO notification_recipients (notification_id, member_id) VALUES (?1, ?2)",
            )
            .bind(notification_id)
            .bind(member_id)
            .execute(pool)
            .await
            .unwrap();
        }
    }

    /// Recipient member ids of all persisted notifications of one kind.
    pub async fn recipients_of_kind(pool: &SqlitePool, kind: &str) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT r.member_id
             FROM notification_recipients r
             JOIN notifications n ON n.notification_id = r.notification_id
             WHERE n.kind = ?1
             ORDER BY r.member_id ASC",
        )
        .bind(kind)
        .fetch_all(pool)
        .await
        .unwrap()
    }
}
