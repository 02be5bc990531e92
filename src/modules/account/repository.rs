use uuid::Uuid;

use crate::api::error;
use crate::modules::account::{model::AccountSummary, schema::AccountEntity};

#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<AccountEntity>, error::SystemError>;

    async fn exists(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn find_summaries_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<AccountSummary>, error::SystemError>;
}
