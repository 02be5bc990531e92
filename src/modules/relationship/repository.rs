use uuid::Uuid;

use crate::api::error;
use crate::modules::relationship::schema::{RelationshipEdgeEntity, RelationshipStatus};

/// Outcome of a write conditioned on the status the caller last observed.
/// `Stale` means the stored status no longer matched and nothing was
/// written; the caller must re-read before deciding what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalWrite {
    Applied,
    Stale,
}

impl ConditionalWrite {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows == 0 {
            ConditionalWrite::Stale
        } else {
            ConditionalWrite::Applied
        }
    }

    pub fn is_applied(self) -> bool {
        self == ConditionalWrite::Applied
    }
}

/// Durable storage of relationship edges. The store owns the one-edge-per-
/// unordered-pair invariant: `insert_pending` must fail with a unique
/// violation when any edge already exists between the two accounts, in
/// either direction and any status.
#[async_trait::async_trait]
pub trait RelationshipStore: Send + Sync {
    async fn insert_pending(
        &self,
        requester_id: &Uuid,
        target_id: &Uuid,
    ) -> Result<RelationshipEdgeEntity, error::SystemError>;

    async fn find_by_pair(
        &self,
        account_a: &Uuid,
        account_b: &Uuid,
    ) -> Result<Option<RelationshipEdgeEntity>, error::SystemError>;

    async fn find_by_id(
        &self,
        edge_id: &Uuid,
    ) -> Result<Option<RelationshipEdgeEntity>, error::SystemError>;

    async fn transition(
        &self,
        edge_id: &Uuid,
        expected: RelationshipStatus,
        new: RelationshipStatus,
    ) -> Result<ConditionalWrite, error::SystemError>;

    async fn delete(
        &self,
        edge_id: &Uuid,
        expected: RelationshipStatus,
    ) -> Result<ConditionalWrite, error::SystemError>;

    async fn delete_accepted_by_pair(
        &self,
        account_a: &Uuid,
        account_b: &Uuid,
    ) -> Result<ConditionalWrite, error::SystemError>;

    async fn list_edges_for(
        &self,
        account_id: &Uuid,
        status: RelationshipStatus,
    ) -> Result<Vec<RelationshipEdgeEntity>, error::SystemError>;
}
