use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::account::model::AccountSummary;
use crate::modules::relationship::schema::{RelationshipEdgeEntity, RelationshipStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequestView {
    pub edge_id: Uuid,
    pub is_incoming: bool,
}

/// Caller-relative summary of the relationship between the viewing account
/// and one other account. Derived from the stored edge, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendshipView {
    pub is_friend: bool,
    pub pending: Option<PendingRequestView>,
}

impl FriendshipView {
    pub fn none() -> Self {
        FriendshipView { is_friend: false, pending: None }
    }

    pub fn friends() -> Self {
        FriendshipView { is_friend: true, pending: None }
    }

    pub fn from_edge(edge: Option<&RelationshipEdgeEntity>, viewer: &Uuid) -> Self {
        match edge {
            None => Self::none(),
            Some(edge) => match edge.status {
                RelationshipStatus::Accepted => Self::friends(),
                RelationshipStatus::Pending => FriendshipView {
                    is_friend: false,
                    pending: Some(PendingRequestView {
                        edge_id: edge.id,
                        is_incoming: edge.target_id == *viewer,
                    }),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestBody {
    pub recipient_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendSummary {
    pub account: AccountSummary,
    pub since: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingRequestSummary {
    pub edge_id: Uuid,
    pub account: AccountSummary,
    pub is_incoming: bool,
    pub requested_at: chrono::DateTime<chrono::Utc>,
}
