use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{
    membership_commands_repo, membership_repo, program_commands_repo, program_repo,
};
use crate::error::AppError;
use crate::models::ProgramSummaryRow;

#[derive(Debug, Deserialize)]
pub struct CreateProgramInput {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Serialize)]
pub struct ProgramSummaryView {
    pub program_id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub role: String,
    pub active_member_count: i64,
}

#[derive(Serialize)]
pub struct ProgramMemberView {
    pub member_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub role: String,
    pub joined_at: String,
}

#[derive(Serialize)]
pub struct ProgramDetailView {
    pub program_id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub members: Vec<ProgramMemberView>,
}

fn is_ymd(date: &str) -> bool {
    let mut parts = date.split('-');
    let ok = |s: Option<&str>, len: usize| {
        s.map(|p| p.len() == len && p.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    };
    ok(parts.next(), 4) && ok(parts.next(), 2) && ok(parts.next(), 2) && parts.next().is_none()
}

/// Creates a program and makes the creator its first active admin member in
/// the same transaction.
pub async fn create_program(
    pool: &SqlitePool,
    creator_member_id: &str,
    input: &CreateProgramInput,
) -> Result<String, AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Invalid("name is required"));
    }
    if !is_ymd(&input.start_date) || !is_ymd(&input.end_date) {
        return Err(AppError::Invalid("dates must be YYYY-MM-DD"));
    }
    if input.end_date < input.start_date {
        return Err(AppError::Invalid("end_date precedes start_date"));
    }

    let program_id = Uuid::new_v4().to_string();
    let mut tx = pool.begin().await?;
    program_commands_repo::insert_program(
        &mut tx,
        program_commands_repo::NewProgram {
            program_id: &program_id,
            name,
            start_date: &input.start_date,
            end_date: &input.end_date,
            created_by: creator_member_id,
        },
    )
    .await?;
    membership_commands_repo::insert_membership(&mut tx, &program_id, creator_member_id, "admin")
        .await?;
    tx.commit().await?;

    Ok(program_id)
}

/// Joins (or rejoins) a program as a plain member. Rejoining resets the
/// membership's joined_at, so returning members queue at the back of the
/// admin-succession order.
pub async fn join_program(
    pool: &SqlitePool,
    program_id: &str,
    member_id: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let Some(program) = program_repo::load_program_tx(&mut tx, program_id).await? else {
        return Err(AppError::NotFound);
    };
    if program.is_deleted != 0 {
        return Err(AppError::NotFound);
    }

    match membership_repo::load_any(&mut tx, program_id, member_id).await? {
        Some(m) if m.status == "active" => {
            return Err(AppError::Conflict("already an active member"));
        }
        Some(_) => {
            membership_commands_repo::reactivate(&mut tx, program_id, member_id).await?;
        }
        None => {
            membership_commands_repo::insert_membership(&mut tx, program_id, member_id, "member")
                .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}

pub async fn list_my_programs(
    pool: &SqlitePool,
    member_id: &str,
) -> sqlx::Result<Vec<ProgramSummaryView>> {
    let rows = program_repo::list_for_member(pool, member_id).await?;
    Ok(rows.into_iter().map(summary_view).collect())
}

fn summary_view(row: ProgramSummaryRow) -> ProgramSummaryView {
    ProgramSummaryView {
        program_id: row.program_id,
        name: row.name,
        start_date: row.start_date,
        end_date: row.end_date,
        status: row.status,
        role: row.role,
        active_member_count: row.active_member_count,
    }
}

/// Detail with the active roster; only visible to active members.
pub async fn load_program_detail(
    pool: &SqlitePool,
    program_id: &str,
    viewer_member_id: &str,
) -> Result<ProgramDetailView, AppError> {
    let Some(program) = program_repo::load_program(pool, program_id).await? else {
        return Err(AppError::NotFound);
    };
    if program.is_deleted != 0 {
        return Err(AppError::NotFound);
    }
    if membership_repo::load_active_pool(pool, program_id, viewer_member_id)
        .await?
        .is_none()
    {
        return Err(AppError::Forbidden("not a member of this program"));
    }

    let members = membership_repo::list_active_members(pool, program_id)
        .await?
        .into_iter()
        .map(|m| ProgramMemberView {
            member_id: m.member_id,
            username: m.username,
            display_name: m.display_name,
            role: m.role,
            joined_at: m.joined_at,
        })
        .collect();

    Ok(ProgramDetailView {
        program_id: program.program_id,
        name: program.name,
        start_date: program.start_date,
        end_date: program.end_date,
        status: program.status,
        members,
    })
}

/// True when the member holds an active admin membership in the program.
pub async fn is_program_admin(
    pool: &SqlitePool,
    program_id: &str,
    member_id: &str,
) -> sqlx::Result<bool> {
    Ok(membership_repo::load_active_pool(pool, program_id, member_id)
        .await?
        .map(|m| m.role == "admin")
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::services::fixtures;

    #[tokio::test]
    async fn creating_a_program_makes_the_creator_an_active_admin() {
        let pool = test_pool().await;
        fixtures::seed_member(&pool, "creator").await;

        let program_id = create_program(
            &pool,
            "creator",
            &CreateProgramInput {
                name: "Spring Cut".to_string(),
                start_date: "2026-03-01".to_string(),
                end_date: "2026-05-31".to_string(),
            },
        )
        .await
        .unwrap();

        let role: String = sqlx::query_scalar(
            "SELECT role FROM program_memberships WHERE program_id = ?1 AND member_id = 'creator' AND status = 'active'",
        )
        .bind(&program_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(role, "admin");

        let mine = list_my_programs(&pool, "creator").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].active_member_count, 1);
    }

    #[tokio::test]
    async fn invalid_dates_are_rejected() {
        let pool = test_pool().await;
        fixtures::seed_member(&pool, "creator").await;

        let err = create_program(
            &pool,
            "creator",
            &CreateProgramInput {
                name: "Backwards".to_string(),
                start_date: "2026-06-01".to_string(),
                end_date: "2026-01-01".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Invalid(_)));
    }

    #[tokio::test]
    async fn joining_twice_is_a_conflict() {
        let pool = test_pool().await;
        fixtures::seed_program_with_members(&pool, "p1", &[("ma", "admin", "2026-01-01")]).await;
        fixtures::seed_member(&pool, "mb").await;

        join_program(&pool, "p1", "mb").await.unwrap();
        let err = join_program(&pool, "p1", "mb").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn rejoining_resets_the_membership() {
        let pool = test_pool().await;
        fixtures::seed_program_with_members(
            &pool,
            "p1",
            &[("ma", "admin", "2026-01-01"), ("mb", "logger", "2026-01-02")],
        )
        .await;
        sqlx::query(
            "UPDATE program_memberships SET status = 'left' WHERE program_id = 'p1' AND member_id = 'mb'",
        )
        .execute(&pool)
        .await
        .unwrap();

        join_program(&pool, "p1", "mb").await.unwrap();

        let (role, status, joined_at): (String, String, String) = sqlx::query_as(
            "SELECT role, status, joined_at FROM program_memberships WHERE program_id = 'p1' AND member_id = 'mb'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(role, "member");
        assert_eq!(status, "active");
        assert!(joined_at > "2026-01-02".to_string());
    }

    #[tokio::test]
    async fn joining_a_soft_deleted_program_is_not_found() {
        let pool = test_pool().await;
        fixtures::seed_program_with_members(&pool, "p1", &[("ma", "admin", "2026-01-01")]).await;
        sqlx::query("UPDATE programs SET is_deleted = 1 WHERE program_id = 'p1'")
            .execute(&pool)
            .await
            .unwrap();
        fixtures::seed_member(&pool, "mb").await;

        let err = join_program(&pool, "p1", "mb").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn detail_is_members_only() {
        let pool = test_pool().await;
        fixtures::seed_program_with_members(&pool, "p1", &[("ma", "admin", "2026-01-01")]).await;
        fixtures::seed_member(&pool, "outsider").await;

        let err = load_program_detail(&pool, "p1", "outsider").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let detail = load_program_detail(&pool, "p1", "ma").await.unwrap();
        assert_eq!(detail.members.len(), 1);
        assert_eq!(detail.members[0].role, "admin");
    }
}
