use serde::Serialize;

// Unacknowledged feed entry; `kind` goes out as `type` to match the payload
// shape clients already consume from the live stream.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NotificationFeedRow {
    #[serde(rename = "id")]
    pub notification_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub program_id: Option<String>,
    pub actor_member_id: Option<String>,
    pub title: String,
    pub body: String,
    pub created_at: String,
}
