use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::account::schema::AccountEntity;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl From<AccountEntity> for AccountSummary {
    fn from(account: AccountEntity) -> Self {
        AccountSummary {
            id: account.id,
            username: account.username,
            display_name: account.display_name,
            avatar_url: account.avatar_url,
        }
    }
}
