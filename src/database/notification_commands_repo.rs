use sqlx::SqliteConnection;

pub struct NewNotificationRow<'a> {
    pub notification_id: &'a str,
    pub kind: &'a str,
    pub program_id: Option<&'a str>,
    pub actor_member_id: Option<&'a str>,
    pub title: &'a str,
    pub body: &'a str,
}

const SQL_INSERT_NOTIFICATION: &str = r#"
INSERT INTO notifications (
  notification_id,
  kind,
  program_id,
  actor_member_id,
  title,
  body,
  created_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, strftime('%Y-%m-%dT%H:%M:%f', 'now'))
RETURNING created_at
"#;

/// Inserts the notification row and returns its created_at so the live
/// payload carries the exact persisted timestamp.
pub async fn insert_notification(
    conn: &mut SqliteConnection,
    n: NewNotificationRow<'_>,
) -> sqlx::Result<String> {
    sqlx::query_scalar::<_, String>(SQL_INSERT_NOTIFICATION)
        .bind(n.notification_id)
        .bind(n.kind)
        .bind(n.program_id)
        .bind(n.actor_member_id)
        .bind(n.title)
        .bind(n.body)
        .fetch_one(&mut *conn)
        .await
}

const SQL_INSERT_RECIPIENT: &str = r#"
INSERT INTO notification_recipients (
  notification_id,
  member_id
) VALUES (?1, ?2)
"#;

pub async fn insert_recipient(
    conn: &mut SqliteConnection,
    notification_id: &str,
    member_id: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_RECIPIENT)
        .bind(notification_id)
        .bind(member_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// Notifications carry free-text titles/bodies naming the actor, so rows the
// member caused are removed outright when that member is deleted.
const SQL_PURGE_BY_ACTOR: &str = r#"
DELETE FROM notifications
WHERE actor_member_id = ?1
"#;

pub async fn purge_by_actor(conn: &mut SqliteConnection, member_id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_PURGE_BY_ACTOR)
        .bind(member_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}
