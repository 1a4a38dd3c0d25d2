use std::collections::HashSet;

use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::database::notification_commands_repo::{self, NewNotificationRow};
use crate::live::{LiveRegistry, NotificationPayload};

pub struct NewNotification<'a> {
    pub kind: &'a str,
    pub program_id: Option<&'a str>,
    pub actor_member_id: Option<&'a str>,
    pub title: &'a str,
    pub body: &'a str,
}

struct DeferredPush {
    payload: NotificationPayload,
    recipient_ids: Vec<String>,
}

/// Live pushes queued during a transaction. The queue is flushed by the
/// caller only after the transaction commits; dropping it (rollback, error)
/// discards the pushes, so clients never see an event whose rows were never
/// persisted.
#[derive(Default)]
pub struct DispatchQueue {
    deferred: Vec<DeferredPush>,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deferred.is_empty()
    }

    pub fn flush(self, live: &LiveRegistry) {
        for push in self.deferred {
            for member_id in &push.recipient_ids {
                live.push(member_id, push.payload.clone());
            }
        }
    }
}

/// Creates a notification row plus one recipient row per unique recipient,
/// inside the caller's transaction, and queues the live push for delivery
/// after commit. Returns the notification id, or `None` when the recipient
/// set is empty after dedup (no rows are written in that case).
pub async fn notify(
    tx: &mut Transaction<'_, Sqlite>,
    queue: &mut DispatchQueue,
    n: NewNotification<'_>,
    recipient_ids: &[String],
) -> sqlx::Result<Option<String>> {
    let mut seen = HashSet::new();
    let recipients: Vec<&str> = recipient_ids
        .iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect();

    if recipients.is_empty() {
        return Ok(None);
    }

    let notification_id = Uuid::new_v4().to_string();
    let created_at = notification_commands_repo::insert_notification(
        &mut *tx,
        NewNotificationRow {
            notification_id: &notification_id,
            kind: n.kind,
            program_id: n.program_id,
            actor_member_id: n.actor_member_id,
            title: n.title,
            body: n.body,
        },
    )
    .await?;

    for member_id in &recipients {
        notification_commands_repo::insert_recipient(&mut *tx, &notification_id, member_id)
            .await?;
    }

    queue.deferred.push(DeferredPush {
        payload: NotificationPayload {
            id: notification_id.clone(),
            kind: n.kind.to_string(),
            program_id: n.program_id.map(str::to_string),
            actor_member_id: n.actor_member_id.map(str::to_string),
            title: n.title.to_string(),
            body: n.body.to_string(),
            created_at,
        },
        recipient_ids: recipients.iter().map(|s| s.to_string()).collect(),
    });

    Ok(Some(notification_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::services::fixtures;
    use sqlx::SqlitePool;

    fn note<'a>() -> NewNotification<'a> {
        NewNotification {
            kind: "program.member_left",
            program_id: Some("p1"),
            actor_member_id: None,
            title: "Member left",
            body: "alice left Spring Cut",
        }
    }

    async fn notification_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn recipient_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM notification_recipients")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn empty_recipient_set_creates_no_rows() {
        let pool = test_pool().await;
        fixtures::seed_program_with_members(&pool, "p1", &[("m1", "admin", "2026-01-01")]).await;

        let mut tx = pool.begin().await.unwrap();
        let mut queue = DispatchQueue::new();
        let id = notify(&mut tx, &mut queue, note(), &[]).await.unwrap();
        tx.commit().await.unwrap();

        assert!(id.is_none());
        assert!(queue.is_empty());
        assert_eq!(notification_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn recipients_are_deduplicated() {
        let pool = test_pool().await;
        fixtures::seed_program_with_members(&pool, "p1", &[("m1", "admin", "2026-01-01")]).await;

        let mut tx = pool.begin().await.unwrap();
        let mut queue = DispatchQueue::new();
        let id = notify(
            &mut tx,
            &mut queue,
            note(),
            &["m1".to_string(), "m1".to_string(), "m1".to_string()],
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        assert!(id.is_some());
        assert_eq!(notification_count(&pool).await, 1);
        assert_eq!(recipient_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn rollback_discards_rows_and_queued_pushes() {
        let pool = test_pool().await;
        fixtures::seed_program_with_members(&pool, "p1", &[("m1", "admin", "2026-01-01")]).await;

        let live = LiveRegistry::new();
        let (_, mut rx) = live.register("m1");

        let mut tx = pool.begin().await.unwrap();
        let mut queue = DispatchQueue::new();
        notify(&mut tx, &mut queue, note(), &["m1".to_string()])
            .await
            .unwrap();
        drop(tx); // rollback

        assert_eq!(notification_count(&pool).await, 0);
        assert_eq!(recipient_count(&pool).await, 0);

        // The queue is only flushed after commit; on rollback it is dropped.
        drop(queue);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn flush_after_commit_pushes_persisted_payload() {
        let pool = test_pool().await;
        fixtures::seed_program_with_members(&pool, "p1", &[("m1", "admin", "2026-01-01")]).await;

        let live = LiveRegistry::new();
        let (_, mut rx) = live.register("m1");

        let mut tx = pool.begin().await.unwrap();
        let mut queue = DispatchQueue::new();
        let id = notify(&mut tx, &mut queue, note(), &["m1".to_string()])
            .await
            .unwrap()
            .unwrap();
        tx.commit().await.unwrap();
        queue.flush(&live);

        let payload = rx.recv().await.unwrap();
        assert_eq!(payload.id, id);
        assert_eq!(payload.kind, "program.member_left");
        assert_eq!(payload.program_id.as_deref(), Some("p1"));
        assert!(!payload.created_at.is_empty());
    }
}
