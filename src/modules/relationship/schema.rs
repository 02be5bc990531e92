use serde::Serialize;
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize)]
#[sqlx(type_name = "relationship_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "ACCEPTED")]
    Accepted,
}

/// One relationship record between two accounts. Directional while pending
/// (requester sent to target), non-directional once accepted. At most one
/// edge exists per unordered pair of accounts at any time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RelationshipEdgeEntity {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub target_id: Uuid,
    pub status: RelationshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl RelationshipEdgeEntity {
    pub fn other_side(&self, account_id: &Uuid) -> Uuid {
        if self.requester_id == *account_id {
            self.target_id
        } else {
            self.requester_id
        }
    }
}
