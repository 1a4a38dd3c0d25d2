pub mod health_log_repo;
pub mod invite_commands_repo;
pub mod invite_repo;
pub mod member_commands_repo;
pub mod member_repo;
pub mod membership_commands_repo;
pub mod membership_repo;
pub mod notification_commands_repo;
pub mod notification_repo;
pub mod program_commands_repo;
pub mod program_repo;
pub mod workout_repo;

use sqlx::SqlitePool;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Applies the embedded schema. Every statement is IF NOT EXISTS, so this is
/// safe to run on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    ensure_schema(&pool).await.expect("schema");
    pool
}
