#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MembershipRow {
    pub program_id: String,
    pub member_id: String,
    pub role: String,
    pub status: String,
    pub joined_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromotionCandidateRow {
    pub member_id: String,
    pub role: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgramMemberRow {
    pub member_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub role: String,
    pub joined_at: String,
}
