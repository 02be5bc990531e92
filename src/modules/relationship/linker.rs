use uuid::Uuid;

use crate::api::error;

/// Boundary to the contact book: resolves an external contact record to the
/// platform account it is linked to, if any. The relationship core only
/// ever sees the resolved account id.
#[async_trait::async_trait]
pub trait ContactLinker: Send + Sync {
    async fn linked_account(&self, contact_id: &Uuid) -> Result<Option<Uuid>, error::SystemError>;
}

#[derive(Clone)]
pub struct ContactLinkerPg {
    pool: sqlx::PgPool,
}

impl ContactLinkerPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContactLinker for ContactLinkerPg {
    async fn linked_account(&self, contact_id: &Uuid) -> Result<Option<Uuid>, error::SystemError> {
        let account_id: Option<Uuid> =
            sqlx::query_scalar("SELECT account_id FROM contact_links WHERE contact_id = $1")
                .bind(contact_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(account_id)
    }
}
