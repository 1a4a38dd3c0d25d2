use sqlx::SqlitePool;

use crate::database::notification_repo;
use crate::error::AppError;
use crate::models::NotificationFeedRow;

/// Everything the member has not yet acknowledged, oldest first. This is the
/// reconciliation path for clients that were offline when the live push went
/// out.
pub async fn list_unacknowledged(
    pool: &SqlitePool,
    member_id: &str,
) -> sqlx::Result<Vec<NotificationFeedRow>> {
    notification_repo::list_unacknowledged(pool, member_id).await
}

/// Acknowledges one notification for the member. Acknowledging something
/// already acknowledged (or never addressed to the member) is a 404.
pub async fn acknowledge(
    pool: &SqlitePool,
    member_id: &str,
    notification_id: &str,
) -> Result<(), AppError> {
    let updated = notification_repo::acknowledge(pool, notification_id, member_id).await?;
    if updated == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
