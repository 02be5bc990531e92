use uuid::Uuid;

use crate::api::error;
use crate::modules::relationship::{
    repository::{ConditionalWrite, RelationshipStore},
    schema::{RelationshipEdgeEntity, RelationshipStatus},
};

#[derive(Clone)]
pub struct RelationshipStorePg {
    pool: sqlx::PgPool,
}

impl RelationshipStorePg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RelationshipStore for RelationshipStorePg {
    async fn insert_pending(
        &self,
        requester_id: &Uuid,
        target_id: &Uuid,
    ) -> Result<RelationshipEdgeEntity, error::SystemError> {
        // The unique index on (LEAST, GREATEST) of the pair rejects a second
        // edge in either direction; 23505 surfaces as UniqueViolation.
        let edge = sqlx::query_as::<_, RelationshipEdgeEntity>(
            r#"
            INSERT INTO relationship_edges (requester_id, target_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(edge)
    }

    async fn find_by_pair(
        &self,
        account_a: &Uuid,
        account_b: &Uuid,
    ) -> Result<Option<RelationshipEdgeEntity>, error::SystemError> {
        let edge = sqlx::query_as::<_, RelationshipEdgeEntity>(
            r#"
            SELECT *
            FROM relationship_edges
            WHERE
                (requester_id = $1 AND target_id = $2)
            OR (requester_id = $2 AND target_id = $1)
            "#,
        )
        .bind(account_a)
        .bind(account_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(edge)
    }

    async fn find_by_id(
        &self,
        edge_id: &Uuid,
    ) -> Result<Option<RelationshipEdgeEntity>, error::SystemError> {
        let edge = sqlx::query_as::<_, RelationshipEdgeEntity>(
            "SELECT * FROM relationship_edges WHERE id = $1",
        )
        .bind(edge_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(edge)
    }

    async fn transition(
        &self,
        edge_id: &Uuid,
        expected: RelationshipStatus,
        new: RelationshipStatus,
    ) -> Result<ConditionalWrite, error::SystemError> {
        let result = sqlx::query(
            r#"
            UPDATE relationship_edges
            SET status = $3, updated_at = now()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(edge_id)
        .bind(expected)
        .bind(new)
        .execute(&self.pool)
        .await?;

        Ok(ConditionalWrite::from_rows_affected(result.rows_affected()))
    }

    async fn delete(
        &self,
        edge_id: &Uuid,
        expected: RelationshipStatus,
    ) -> Result<ConditionalWrite, error::SystemError> {
        let result = sqlx::query("DELETE FROM relationship_edges WHERE id = $1 AND status = $2")
            .bind(edge_id)
            .bind(expected)
            .execute(&self.pool)
            .await?;

        Ok(ConditionalWrite::from_rows_affected(result.rows_affected()))
    }

    async fn delete_accepted_by_pair(
        &self,
        account_a: &Uuid,
        account_b: &Uuid,
    ) -> Result<ConditionalWrite, error::SystemError> {
        let result = sqlx::query(
            r#"
            DELETE FROM relationship_edges
            WHERE status = $3
              AND (
                    (requester_id = $1 AND target_id = $2)
                 OR (requester_id = $2 AND target_id = $1)
              )
            "#,
        )
        .bind(account_a)
        .bind(account_b)
        .bind(RelationshipStatus::Accepted)
        .execute(&self.pool)
        .await?;

        Ok(ConditionalWrite::from_rows_affected(result.rows_affected()))
    }

    async fn list_edges_for(
        &self,
        account_id: &Uuid,
        status: RelationshipStatus,
    ) -> Result<Vec<RelationshipEdgeEntity>, error::SystemError> {
        let edges = sqlx::query_as::<_, RelationshipEdgeEntity>(
            r#"
            SELECT *
            FROM relationship_edges
            WHERE status = $2
              AND (requester_id = $1 OR target_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(account_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(edges)
    }
}
