use uuid::Uuid;

use crate::api::error;
use crate::modules::account::{
    model::AccountSummary,
    repository::AccountRepository,
    schema::AccountEntity,
};

#[derive(Clone)]
pub struct AccountRepositoryPg {
    pool: sqlx::PgPool,
}

impl AccountRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AccountRepository for AccountRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<AccountEntity>, error::SystemError> {
        let account = sqlx::query_as::<_, AccountEntity>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn exists(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find_summaries_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<AccountSummary>, error::SystemError> {
        let summaries = sqlx::query_as::<_, AccountSummary>(
            r#"
            SELECT
                id,
                username,
                display_name,
                avatar_url
            FROM accounts
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }
}
