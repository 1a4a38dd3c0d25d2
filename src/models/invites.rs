#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgramInviteRow {
    pub invite_id: String,
    pub program_id: String,
    pub inviter_member_id: String,
    pub email: String,
    pub status: String,
    pub created_at: String,
}
