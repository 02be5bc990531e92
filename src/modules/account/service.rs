use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::RedisCache;

use crate::modules::account::{model::AccountSummary, repository::AccountRepository};

#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl AccountService {
    pub fn with_dependencies(
        repo: Arc<dyn AccountRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("AccountService initialized with dependencies");
        AccountService { repo, cache }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<AccountSummary, error::SystemError> {
        let key = format!("account:{}", id);
        if let Some(cached) = self.cache.get::<AccountSummary>(&key).await? {
            info!("Account {} found in cache", id);
            return Ok(cached);
        }
        let account = self.repo.find_by_id(&id).await?;
        if let Some(entity) = account {
            let summary = AccountSummary::from(entity);
            self.cache.set(&key, &summary, 3600).await?;
            info!("Account {} cached", id);
            Ok(summary)
        } else {
            Err(error::SystemError::not_found("Account not found"))
        }
    }
}
