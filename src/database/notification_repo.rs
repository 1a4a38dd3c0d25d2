use sqlx::SqlitePool;

use crate::models::NotificationFeedRow;

const SQL_LIST_UNACKNOWLEDGED: &str = r#"
SELECT
  n.notification_id,
  n.kind,
  n.program_id,
  n.actor_member_id,
  n.title,
  n.body,
  n.created_at
FROM notification_recipients r
JOIN notifications n
  ON n.notification_id = r.notification_id
WHERE r.member_id = ?1
  AND r.acknowledged_at IS NULL
ORDER BY n.created_at ASC, n.notification_id ASC
"#;

pub async fn list_unacknowledged(
    pool: &SqlitePool,
    member_id: &str,
) -> sqlx::Result<Vec<NotificationFeedRow>> {
    sqlx::query_as::<_, NotificationFeedRow>(SQL_LIST_UNACKNOWLEDGED)
        .bind(member_id)
        .fetch_all(pool)
        .await
}

const SQL_ACKNOWLEDGE: &str = r#"
UPDATE notification_recipients
SET acknowledged_at = strftime('%Y-%m-%dT%H:%M:%f', 'now')
WHERE notification_id = ?1
  AND member_id = ?2
  AND acknowledged_at IS NULL
"#;

pub async fn acknowledge(
    pool: &SqlitePool,
    notification_id: &str,
    member_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_ACKNOWLEDGE)
        .bind(notification_id)
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
