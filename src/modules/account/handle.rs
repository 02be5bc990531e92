use actix_web::{get, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    modules::account::{model::AccountSummary, service::AccountService},
};

#[get("/{account_id}")]
pub async fn get_account(
    account_service: web::Data<AccountService>,
    account_id: web::Path<Uuid>,
) -> Result<success::Success<AccountSummary>, error::Error> {
    let account = account_service.get_by_id(*account_id).await?;

    Ok(success::Success::ok(Some(account)))
}
