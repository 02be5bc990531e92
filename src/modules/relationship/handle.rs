use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        account::repository_pg::AccountRepositoryPg,
        relationship::{
            linker::{ContactLinker, ContactLinkerPg},
            model::{FriendSummary, FriendshipView, PendingRequestSummary, SendRequestBody},
            repository_pg::RelationshipStorePg,
            schema::RelationshipEdgeEntity,
            service::RelationshipService,
        },
    },
    utils::ValidatedJson,
};

pub type RelationshipSvc = RelationshipService<RelationshipStorePg, AccountRepositoryPg>;

#[get("/status/{account_id}")]
pub async fn friendship_status(
    relationship_service: web::Data<RelationshipSvc>,
    account_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipView>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let view = relationship_service.check_status(acting, *account_id).await?;

    Ok(success::Success::ok(Some(view)))
}

#[get("/linked/{contact_id}/status")]
pub async fn linked_contact_status(
    relationship_service: web::Data<RelationshipSvc>,
    linker: web::Data<ContactLinkerPg>,
    contact_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipView>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let account_id = linker
        .linked_account(&contact_id)
        .await?
        .ok_or_else(|| error::Error::not_found("Contact is not linked to an account"))?;

    let view = relationship_service.check_status(acting, account_id).await?;

    Ok(success::Success::ok(Some(view)))
}

#[post("/requests")]
pub async fn send_friend_request(
    relationship_service: web::Data<RelationshipSvc>,
    body: ValidatedJson<SendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<RelationshipEdgeEntity>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let edge = relationship_service.send_request(acting, body.0.recipient_id).await?;

    Ok(success::Success::created(Some(edge)).message("Friend request sent successfully"))
}

#[post("/requests/{edge_id}/accept")]
pub async fn accept_friend_request(
    relationship_service: web::Data<RelationshipSvc>,
    edge_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipView>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let view = relationship_service.accept_request(acting, *edge_id).await?;

    Ok(success::Success::ok(Some(view)).message("Friend request accepted successfully"))
}

#[post("/requests/{edge_id}/decline")]
pub async fn decline_friend_request(
    relationship_service: web::Data<RelationshipSvc>,
    edge_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipView>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let view = relationship_service.decline_request(acting, *edge_id).await?;

    Ok(success::Success::ok(Some(view)))
}

#[post("/requests/{edge_id}/cancel")]
pub async fn cancel_friend_request(
    relationship_service: web::Data<RelationshipSvc>,
    edge_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipView>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let view = relationship_service.cancel_request(acting, *edge_id).await?;

    Ok(success::Success::ok(Some(view)))
}

#[delete("/{account_id}")]
pub async fn remove_friend(
    relationship_service: web::Data<RelationshipSvc>,
    account_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let acting = get_claims(&req)?.sub;
    relationship_service.unfriend(acting, *account_id).await?;

    Ok(success::Success::no_content())
}

#[get("/")]
pub async fn list_friends(
    relationship_service: web::Data<RelationshipSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendSummary>>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let friends = relationship_service.list_friends(acting).await?;

    Ok(success::Success::ok(Some(friends)))
}

#[get("/requests")]
pub async fn list_friend_requests(
    relationship_service: web::Data<RelationshipSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PendingRequestSummary>>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let requests = relationship_service.list_requests(acting).await?;

    Ok(success::Success::ok(Some(requests)))
}
