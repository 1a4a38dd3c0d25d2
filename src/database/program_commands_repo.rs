use sqlx::SqliteConnection;

pub struct NewProgram<'a> {
    pub program_id: &'a str,
    pub name: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub created_by: &'a str,
}

const SQL_INSERT_PROGRAM: &str = r#"
INSERT INTO programs (
  program_id,
  name,
  start_date,
  end_date,
  status,
  created_by
) VALUES (?1, ?2, ?3, ?4, 'active', ?5)
"#;

pub async fn insert_program(conn: &mut SqliteConnection, p: NewProgram<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_PROGRAM)
        .bind(p.program_id)
        .bind(p.name)
        .bind(p.start_date)
        .bind(p.end_date)
        .bind(p.created_by)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

const SQL_SOFT_DELETE: &str = r#"
UPDATE programs
SET is_deleted = 1,
    updated_at = strftime('%Y-%m-%dT%H:%M:%f', 'now')
WHERE program_id = ?1
"#;

pub async fn soft_delete(conn: &mut SqliteConnection, program_id: &str) -> sqlx::Result<()> {
    sqlx::query(SQL_SOFT_DELETE)
        .bind(program_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

const SQL_CLEAR_CREATED_BY: &str = r#"
UPDATE programs
SET created_by = NULL,
    updated_at = strftime('%Y-%m-%dT%H:%M:%f', 'now')
WHERE program_id = ?1
"#;

pub async fn clear_created_by(conn: &mut SqliteConnection, program_id: &str) -> sqlx::Result<()> {
    sqlx::query(SQL_CLEAR_CREATED_BY)
        .bind(program_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
