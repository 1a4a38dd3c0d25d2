use sqlx::{SqliteConnection, SqlitePool};

use crate::models::ProgramInviteRow;

const SQL_LOAD_PENDING: &str = r#"
SELECT
  invite_id,
  program_id,
  inviter_member_id,
  email,
  status,
  created_at
FROM program_invites
WHERE invite_id = ?1
  AND status = 'pending'
LIMIT 1
"#;

pub async fn load_pending(
    conn: &mut SqliteConnection,
    invite_id: &str,
) -> sqlx::Result<Option<ProgramInviteRow>> {
    sqlx::query_as::<_, ProgramInviteRow>(SQL_LOAD_PENDING)
        .bind(invite_id)
        .fetch_optional(&mut *conn)
        .await
}

const SQL_LIST_FOR_PROGRAM: &str = r#"
SELECT
  invite_id,
  program_id,
  inviter_member_id,
  email,
  status,
  created_at
FROM program_invites
WHERE program_id = ?1
ORDER BY created_at ASC, invite_id ASC
"#;

pub async fn list_for_program(
    pool: &SqlitePool,
    program_id: &str,
) -> sqlx::Result<Vec<ProgramInviteRow>> {
    sqlx::query_as::<_, ProgramInviteRow>(SQL_LIST_FOR_PROGRAM)
        .bind(program_id)
        .fetch_all(pool)
        .await
}
