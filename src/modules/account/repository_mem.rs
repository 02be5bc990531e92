#![allow(dead_code)]
use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::api::error;
use crate::modules::account::{
    model::AccountSummary,
    repository::AccountRepository,
    schema::AccountEntity,
};

/// In-memory account lookup used by unit tests.
#[derive(Default)]
pub struct AccountRepositoryMem {
    accounts: Mutex<HashMap<Uuid, AccountEntity>>,
}

impl AccountRepositoryMem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, username: &str) -> Uuid {
        let account = AccountEntity {
            id: Uuid::now_v7(),
            username: username.to_string(),
            display_name: username.to_string(),
            avatar_url: None,
            created_at: chrono::Utc::now(),
        };
        let id = account.id;
        self.accounts.lock().unwrap().insert(id, account);
        id
    }
}

#[async_trait::async_trait]
impl AccountRepository for AccountRepositoryMem {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<AccountEntity>, error::SystemError> {
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    async fn exists(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        Ok(self.accounts.lock().unwrap().contains_key(id))
    }

    async fn find_summaries_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<AccountSummary>, error::SystemError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| accounts.get(id).cloned())
            .map(AccountSummary::from)
            .collect())
    }
}
