#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgramRow {
    pub program_id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub created_by: Option<String>,
    pub is_deleted: i64,
}

// One row per program the member is active in, for the "my programs" list.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgramSummaryRow {
    pub program_id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub role: String,
    pub active_member_count: i64,
}
