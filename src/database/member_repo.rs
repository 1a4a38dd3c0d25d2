use sqlx::{SqliteConnection, SqlitePool};

use crate::models::MemberRow;

const SQL_LOAD_MEMBER: &str = r#"
SELECT
  member_id,
  username,
  display_name,
  global_role,
  created_at
FROM members
WHERE member_id = ?1
LIMIT 1
"#;

pub async fn load_member(pool: &SqlitePool, member_id: &str) -> sqlx::Result<Option<MemberRow>> {
    sqlx::query_as::<_, MemberRow>(SQL_LOAD_MEMBER)
        .bind(member_id)
        .fetch_optional(pool)
        .await
}

pub async fn load_member_tx(
    conn: &mut SqliteConnection,
    member_id: &str,
) -> sqlx::Result<Option<MemberRow>> {
    sqlx::query_as::<_, MemberRow>(SQL_LOAD_MEMBER)
        .bind(member_id)
        .fetch_optional(&mut *conn)
        .await
}

const SQL_LOAD_USERNAME: &str = r#"
SELECT username
FROM members
WHERE member_id = ?1
LIMIT 1
"#;

pub async fn load_username_tx(
    conn: &mut SqliteConnection,
    member_id: &str,
) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar::<_, String>(SQL_LOAD_USERNAME)
        .bind(member_id)
        .fetch_optional(&mut *conn)
        .await
}

const SQL_LIST_EMAILS: &str = r#"
SELECT email
FROM member_emails
WHERE member_id = ?1
ORDER BY email ASC
"#;

pub async fn list_emails(pool: &SqlitePool, member_id: &str) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(SQL_LIST_EMAILS)
        .bind(member_id)
        .fetch_all(pool)
        .await
}

const SQL_EMAIL_BELONGS_TO: &str = r#"
SELECT COUNT(*)
FROM member_emails
WHERE member_id = ?1
  AND email = ?2
"#;

pub async fn email_belongs_to(
    conn: &mut SqliteConnection,
    member_id: &str,
    email: &str,
) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_EMAIL_BELONGS_TO)
        .bind(member_id)
        .bind(email)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}
