#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberRow {
    pub member_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub global_role: String,
    pub created_at: String,
}
