use sqlx::{SqliteConnection, SqlitePool};

const SQL_DELETE_MEMBER: &str = r#"
DELETE FROM members
WHERE member_id = ?1
"#;

/// Removes the member row. Memberships, emails, workouts, health logs and
/// notification-recipient rows go with it via ON DELETE CASCADE.
pub async fn delete_member(conn: &mut SqliteConnection, member_id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_MEMBER)
        .bind(member_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_ADD_EMAIL: &str = r#"
INSERT OR IGNORE INTO member_emails (member_id, email)
VALUES (?1, ?2)
"#;

pub async fn add_email(pool: &SqlitePool, member_id: &str, email: &str) -> sqlx::Result<()> {
    sqlx::query(SQL_ADD_EMAIL)
        .bind(member_id)
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}
