#![allow(dead_code)]
use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::api::error;
use crate::modules::relationship::{
    repository::{ConditionalWrite, RelationshipStore},
    schema::{RelationshipEdgeEntity, RelationshipStatus},
};

/// In-memory store with the same conditional-write contract as the Postgres
/// implementation. Backs the unit tests.
#[derive(Default)]
pub struct RelationshipStoreMem {
    edges: Mutex<HashMap<Uuid, RelationshipEdgeEntity>>,
}

impl RelationshipStoreMem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.lock().unwrap().len()
    }
}

fn same_pair(edge: &RelationshipEdgeEntity, account_a: &Uuid, account_b: &Uuid) -> bool {
    (edge.requester_id == *account_a && edge.target_id == *account_b)
        || (edge.requester_id == *account_b && edge.target_id == *account_a)
}

#[async_trait::async_trait]
impl RelationshipStore for RelationshipStoreMem {
    async fn insert_pending(
        &self,
        requester_id: &Uuid,
        target_id: &Uuid,
    ) -> Result<RelationshipEdgeEntity, error::SystemError> {
        let mut edges = self.edges.lock().unwrap();

        if edges.values().any(|e| same_pair(e, requester_id, target_id)) {
            return Err(error::SystemError::UniqueViolation(error::DbErrorMeta {
                code: Some("23505".to_string()),
                constraint: Some("relationship_edges_pair_key".to_string()),
                message: "duplicate relationship edge".to_string(),
            }));
        }

        let now = chrono::Utc::now();
        let edge = RelationshipEdgeEntity {
            id: Uuid::now_v7(),
            requester_id: *requester_id,
            target_id: *target_id,
            status: RelationshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        edges.insert(edge.id, edge.clone());

        Ok(edge)
    }

    async fn find_by_pair(
        &self,
        account_a: &Uuid,
        account_b: &Uuid,
    ) -> Result<Option<RelationshipEdgeEntity>, error::SystemError> {
        let edges = self.edges.lock().unwrap();
        Ok(edges.values().find(|e| same_pair(e, account_a, account_b)).cloned())
    }

    async fn find_by_id(
        &self,
        edge_id: &Uuid,
    ) -> Result<Option<RelationshipEdgeEntity>, error::SystemError> {
        Ok(self.edges.lock().unwrap().get(edge_id).cloned())
    }

    async fn transition(
        &self,
        edge_id: &Uuid,
        expected: RelationshipStatus,
        new: RelationshipStatus,
    ) -> Result<ConditionalWrite, error::SystemError> {
        let mut edges = self.edges.lock().unwrap();
        match edges.get_mut(edge_id) {
            Some(edge) if edge.status == expected => {
                edge.status = new;
                edge.updated_at = chrono::Utc::now();
                Ok(ConditionalWrite::Applied)
            }
            _ => Ok(ConditionalWrite::Stale),
        }
    }

    async fn delete(
        &self,
        edge_id: &Uuid,
        expected: RelationshipStatus,
    ) -> Result<ConditionalWrite, error::SystemError> {
        let mut edges = self.edges.lock().unwrap();
        match edges.get(edge_id) {
            Some(edge) if edge.status == expected => {
                edges.remove(edge_id);
                Ok(ConditionalWrite::Applied)
            }
            _ => Ok(ConditionalWrite::Stale),
        }
    }

    async fn delete_accepted_by_pair(
        &self,
        account_a: &Uuid,
        account_b: &Uuid,
    ) -> Result<ConditionalWrite, error::SystemError> {
        let mut edges = self.edges.lock().unwrap();
        let id = edges
            .values()
            .find(|e| {
                e.status == RelationshipStatus::Accepted && same_pair(e, account_a, account_b)
            })
            .map(|e| e.id);
        match id {
            Some(id) => {
                edges.remove(&id);
                Ok(ConditionalWrite::Applied)
            }
            None => Ok(ConditionalWrite::Stale),
        }
    }

    async fn list_edges_for(
        &self,
        account_id: &Uuid,
        status: RelationshipStatus,
    ) -> Result<Vec<RelationshipEdgeEntity>, error::SystemError> {
        let edges = self.edges.lock().unwrap();
        let mut matching: Vec<RelationshipEdgeEntity> = edges
            .values()
            .filter(|e| {
                e.status == status
                    && (e.requester_id == *account_id || e.target_id == *account_id)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}
