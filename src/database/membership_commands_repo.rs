use sqlx::SqliteConnection;

const SQL_INSERT_MEMBERSHIP: &str = r#"
INSERT INTO program_memberships (
  program_id,
  member_id,
  role,
  status
) VALUES (?1, ?2, ?3, 'active')
"#;

pub async fn insert_membership(
    conn: &mut SqliteConnection,
    program_id: &str,
    member_id: &str,
    role: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_MEMBERSHIP)
        .bind(program_id)
        .bind(member_id)
        .bind(role)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

const SQL_SET_ROLE: &str = r#"
UPDATE program_memberships
SET role = ?3,
    updated_at = strftime('%Y-%m-%dT%H:%M:%f', 'now')
WHERE program_id = ?1
  AND member_id = ?2
"#;

pub async fn set_role(
    conn: &mut SqliteConnection,
    program_id: &str,
    member_id: &str,
    role: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_SET_ROLE)
        .bind(program_id)
        .bind(member_id)
        .bind(role)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

const SQL_SET_STATUS: &str = r#"
UPDATE program_memberships
SET status = ?3,
    updated_at = strftime('%Y-%m-%dT%H:%M:%f', 'now')
WHERE program_id = ?1
  AND member_id = ?2
"#;

pub async fn set_status(
    conn: &mut SqliteConnection,
    program_id: &str,
    member_id: &str,
    status: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_SET_STATUS)
        .bind(program_id)
        .bind(member_id)
        .bind(status)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// Rejoin after leaving: fresh joined_at, back to plain member.
const SQL_REACTIVATE: &str = r#"
UPDATE program_memberships
SET status = 'active',
    role = 'member',
    joined_at = strftime('%Y-%m-%dT%H:%M:%f', 'now'),
    updated_at = strftime('%Y-%m-%dT%H:%M:%f', 'now')
WHERE program_id = ?1
  AND member_id = ?2
"#;

pub async fn reactivate(
    conn: &mut SqliteConnection,
    program_id: &str,
    member_id: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_REACTIVATE)
        .bind(program_id)
        .bind(member_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
