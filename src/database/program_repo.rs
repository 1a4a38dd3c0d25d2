use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{ProgramRow, ProgramSummaryRow};

const SQL_LOAD_PROGRAM: &str = r#"
SELECT
  program_id,
  name,
  start_date,
  end_date,
  status,
  created_by,
  is_deleted
FROM programs
WHERE program_id = ?1
LIMIT 1
"#;

pub async fn load_program(pool: &SqlitePool, program_id: &str) -> sqlx::Result<Option<ProgramRow>> {
    sqlx::query_as::<_, ProgramRow>(SQL_LOAD_PROGRAM)
        .bind(program_id)
        .fetch_optional(pool)
        .await
}

pub async fn load_program_tx(
    conn: &mut SqliteConnection,
    program_id: &str,
) -> sqlx::Result<Option<ProgramRow>> {
    sqlx::query_as::<_, ProgramRow>(SQL_LOAD_PROGRAM)
        .bind(program_id)
        .fetch_optional(&mut *conn)
        .await
}

const SQL_LIST_FOR_MEMBER: &str = r#"
SELECT
  p.program_id,
  p.name,
  p.start_date,
  p.end_date,
  p.status,
  pm.role,
  (
    SELECT COUNT(*)
    FROM program_memberships x
    WHERE x.program_id = p.program_id
      AND x.status = 'active'
  ) AS active_member_count
FROM programs p
JOIN program_memberships pm
  ON pm.program_id = p.program_id
WHERE pm.member_id = ?1
  AND pm.status = 'active'
  AND p.is_deleted = 0
ORDER BY p.start_date ASC, p.program_id ASC
"#;

pub async fn list_for_member(
    pool: &SqlitePool,
    member_id: &str,
) -> sqlx::Result<Vec<ProgramSummaryRow>> {
    sqlx::query_as::<_, ProgramSummaryRow>(SQL_LIST_FOR_MEMBER)
        .bind(member_id)
        .fetch_all(pool)
        .await
}

// Programs a departing member touches: every program they are active in,
// plus every surviving program they created.
const SQL_TOUCHED_BY_MEMBER: &str = r#"
SELECT DISTINCT p.program_id
FROM programs p
LEFT JOIN program_memberships pm
  ON pm.program_id = p.program_id
 AND pm.member_id = ?1
 AND pm.status = 'active'
WHERE p.is_deleted = 0
  AND (pm.member_id IS NOT NULL OR p.created_by = ?1)
ORDER BY p.program_id ASC
"#;

pub async fn touched_by_member(
    conn: &mut SqliteConnection,
    member_id: &str,
) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(SQL_TOUCHED_BY_MEMBER)
        .bind(member_id)
        .fetch_all(&mut *conn)
        .await
}
