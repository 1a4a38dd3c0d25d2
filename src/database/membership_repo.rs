use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{MembershipRow, ProgramMemberRow, PromotionCandidateRow};

const SQL_LOAD_ACTIVE: &str = r#"
SELECT
  program_id,
  member_id,
  role,
  status,
  joined_at
FROM program_memberships
WHERE program_id = ?1
  AND member_id = ?2
  AND status = 'active'
LIMIT 1
"#;

pub async fn load_active(
    conn: &mut SqliteConnection,
    program_id: &str,
    member_id: &str,
) -> sqlx::Result<Option<MembershipRow>> {
    sqlx::query_as::<_, MembershipRow>(SQL_LOAD_ACTIVE)
        .bind(program_id)
        .bind(member_id)
        .fetch_optional(&mut *conn)
        .await
}

const SQL_LOAD_ANY: &str = r#"
SELECT
  program_id,
  member_id,
  role,
  status,
  joined_at
FROM program_memberships
WHERE program_id = ?1
  AND member_id = ?2
LIMIT 1
"#;

pub async fn load_any(
    conn: &mut SqliteConnection,
    program_id: &str,
    member_id: &str,
) -> sqlx::Result<Option<MembershipRow>> {
    sqlx::query_as::<_, MembershipRow>(SQL_LOAD_ANY)
        .bind(program_id)
        .bind(member_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn load_active_pool(
    pool: &SqlitePool,
    program_id: &str,
    member_id: &str,
) -> sqlx::Result<Option<MembershipRow>> {
    sqlx::query_as::<_, MembershipRow>(SQL_LOAD_ACTIVE)
        .bind(program_id)
        .bind(member_id)
        .fetch_optional(pool)
        .await
}

const SQL_COUNT_ACTIVE_EXCLUDING: &str = r#"
SELECT COUNT(*)
FROM program_memberships
WHERE program_id = ?1
  AND member_id != ?2
  AND status = 'active'
"#;

pub async fn count_active_excluding(
    conn: &mut SqliteConnection,
    program_id: &str,
    member_id: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_ACTIVE_EXCLUDING)
        .bind(program_id)
        .bind(member_id)
        .fetch_one(&mut *conn)
        .await
}

const SQL_COUNT_ACTIVE_ADMINS_EXCLUDING: &str = r#"
SELECT COUNT(*)
FROM program_memberships
WHERE program_id = ?1
  AND member_id != ?2
  AND status = 'active'
  AND role = 'admin'
"#;

pub async fn count_active_admins_excluding(
    conn: &mut SqliteConnection,
    program_id: &str,
    member_id: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_ACTIVE_ADMINS_EXCLUDING)
        .bind(program_id)
        .bind(member_id)
        .fetch_one(&mut *conn)
        .await
}

// Succession order: longest-standing active membership first, member id as
// the tie-break so repeated runs over the same rows pick the same candidate.
const SQL_PROMOTION_CANDIDATE: &str = r#"
SELECT
  member_id,
  role
FROM program_memberships
WHERE program_id = ?1
  AND member_id != ?2
  AND status = 'active'
ORDER BY joined_at ASC, member_id ASC
LIMIT 1
"#;

pub async fn promotion_candidate(
    conn: &mut SqliteConnection,
    program_id: &str,
    exiting_member_id: &str,
) -> sqlx::Result<Option<PromotionCandidateRow>> {
    sqlx::query_as::<_, PromotionCandidateRow>(SQL_PROMOTION_CANDIDATE)
        .bind(program_id)
        .bind(exiting_member_id)
        .fetch_optional(&mut *conn)
        .await
}

const SQL_ACTIVE_MEMBER_IDS_EXCLUDING: &str = r#"
SELECT member_id
FROM program_memberships
WHERE program_id = ?1
  AND member_id != ?2
  AND status = 'active'
ORDER BY joined_at ASC, member_id ASC
"#;

pub async fn active_member_ids_excluding(
    conn: &mut SqliteConnection,
    program_id: &str,
    member_id: &str,
) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(SQL_ACTIVE_MEMBER_IDS_EXCLUDING)
        .bind(program_id)
        .bind(member_id)
        .fetch_all(&mut *conn)
        .await
}

const SQL_LIST_ACTIVE_MEMBERS: &str = r#"
SELECT
  pm.member_id,
  m.username,
  m.display_name,
  pm.role,
  pm.joined_at
FROM program_memberships pm
JOIN members m
  ON m.member_id = pm.member_id
WHERE pm.program_id = ?1
  AND pm.status = 'active'
ORDER BY pm.joined_at ASC, pm.member_id ASC
"#;

pub async fn list_active_members(
    pool: &SqlitePool,
    program_id: &str,
) -> sqlx::Result<Vec<ProgramMemberRow>> {
    sqlx::query_as::<_, ProgramMemberRow>(SQL_LIST_ACTIVE_MEMBERS)
        .bind(program_id)
        .fetch_all(pool)
        .await
}
