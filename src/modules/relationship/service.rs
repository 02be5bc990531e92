use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::account::{model::AccountSummary, repository::AccountRepository};

use crate::modules::relationship::{
    model::{FriendSummary, FriendshipView, PendingRequestSummary},
    repository::RelationshipStore,
    schema::{RelationshipEdgeEntity, RelationshipStatus},
};

pub struct RelationshipService<S, A>
where
    S: RelationshipStore,
    A: AccountRepository,
{
    store: Arc<S>,
    accounts: Arc<A>,
}

impl<S, A> Clone for RelationshipService<S, A>
where
    S: RelationshipStore,
    A: AccountRepository,
{
    fn clone(&self) -> Self {
        RelationshipService { store: Arc::clone(&self.store), accounts: Arc::clone(&self.accounts) }
    }
}

impl<S, A> RelationshipService<S, A>
where
    S: RelationshipStore,
    A: AccountRepository,
{
    pub fn with_dependencies(store: Arc<S>, accounts: Arc<A>) -> Self {
        RelationshipService { store, accounts }
    }

    /// Point-in-time view of the relationship between `acting` and `other`.
    pub async fn check_status(
        &self,
        acting: Uuid,
        other: Uuid,
    ) -> Result<FriendshipView, error::SystemError> {
        let edge = self.store.find_by_pair(&acting, &other).await?;
        Ok(FriendshipView::from_edge(edge.as_ref(), &acting))
    }

    pub async fn send_request(
        &self,
        acting: Uuid,
        other: Uuid,
    ) -> Result<RelationshipEdgeEntity, error::SystemError> {
        if acting == other {
            return Err(error::SystemError::bad_request(
                "Cannot send a friend request to yourself",
            ));
        }

        let (recipient_exists, existing) = tokio::try_join!(
            self.accounts.exists(&other),
            self.store.find_by_pair(&acting, &other),
        )?;

        if !recipient_exists {
            return Err(error::SystemError::not_found("Recipient account not found"));
        }

        if let Some(edge) = existing {
            return Err(match edge.status {
                RelationshipStatus::Accepted => {
                    error::SystemError::conflict("Accounts are already friends")
                }
                RelationshipStatus::Pending => {
                    error::SystemError::conflict("Friend request already pending")
                }
            });
        }

        // The pre-read gives a precise message; the store's pair uniqueness
        // still decides the concurrent case.
        match self.store.insert_pending(&acting, &other).await {
            Ok(edge) => Ok(edge),
            Err(error::SystemError::UniqueViolation(_)) => {
                Err(error::SystemError::conflict("Friend request already pending"))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn accept_request(
        &self,
        acting: Uuid,
        edge_id: Uuid,
    ) -> Result<FriendshipView, error::SystemError> {
        let edge = self
            .store
            .find_by_id(&edge_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if edge.target_id != acting {
            return Err(error::SystemError::forbidden(
                "Only the recipient can accept a friend request",
            ));
        }

        if edge.status == RelationshipStatus::Pending {
            let outcome = self
                .store
                .transition(&edge.id, RelationshipStatus::Pending, RelationshipStatus::Accepted)
                .await?;
            if outcome.is_applied() {
                return Ok(FriendshipView::friends());
            }
        }

        self.resolve_after_lost_race(acting, &edge).await
    }

    pub async fn decline_request(
        &self,
        acting: Uuid,
        edge_id: Uuid,
    ) -> Result<FriendshipView, error::SystemError> {
        let edge = self
            .store
            .find_by_id(&edge_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if edge.target_id != acting {
            return Err(error::SystemError::forbidden(
                "Only the recipient can decline a friend request",
            ));
        }

        if edge.status == RelationshipStatus::Pending {
            let outcome = self.store.delete(&edge.id, RelationshipStatus::Pending).await?;
            if outcome.is_applied() {
                return Ok(FriendshipView::none());
            }
        }

        self.resolve_after_lost_race(acting, &edge).await
    }

    pub async fn cancel_request(
        &self,
        acting: Uuid,
        edge_id: Uuid,
    ) -> Result<FriendshipView, error::SystemError> {
        let edge = self
            .store
            .find_by_id(&edge_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if edge.requester_id != acting {
            return Err(error::SystemError::forbidden(
                "Only the sender can cancel a friend request",
            ));
        }

        if edge.status == RelationshipStatus::Pending {
            let outcome = self.store.delete(&edge.id, RelationshipStatus::Pending).await?;
            if outcome.is_applied() {
                return Ok(FriendshipView::none());
            }
        }

        self.resolve_after_lost_race(acting, &edge).await
    }

    /// Removing a friendship that is already gone is not an error: the
    /// caller that loses a mutual-unfriend race still gets a success.
    pub async fn unfriend(&self, acting: Uuid, other: Uuid) -> Result<(), error::SystemError> {
        if acting == other {
            return Err(error::SystemError::bad_request("Cannot unfriend yourself"));
        }

        let outcome = self.store.delete_accepted_by_pair(&acting, &other).await?;
        if !outcome.is_applied() {
            debug!("unfriend {} -> {}: no accepted edge, treating as no-op", acting, other);
        }

        Ok(())
    }

    pub async fn list_friends(
        &self,
        acting: Uuid,
    ) -> Result<Vec<FriendSummary>, error::SystemError> {
        let edges = self.store.list_edges_for(&acting, RelationshipStatus::Accepted).await?;
        let mut profiles = self.counterpart_profiles(&acting, &edges).await?;

        Ok(edges
            .into_iter()
            .filter_map(|edge| {
                let other = edge.other_side(&acting);
                profiles
                    .remove(&other)
                    .map(|account| FriendSummary { account, since: edge.updated_at })
            })
            .collect())
    }

    pub async fn list_requests(
        &self,
        acting: Uuid,
    ) -> Result<Vec<PendingRequestSummary>, error::SystemError> {
        let edges = self.store.list_edges_for(&acting, RelationshipStatus::Pending).await?;
        let mut profiles = self.counterpart_profiles(&acting, &edges).await?;

        Ok(edges
            .into_iter()
            .filter_map(|edge| {
                let other = edge.other_side(&acting);
                profiles.remove(&other).map(|account| PendingRequestSummary {
                    edge_id: edge.id,
                    account,
                    is_incoming: edge.target_id == acting,
                    requested_at: edge.created_at,
                })
            })
            .collect())
    }

    async fn counterpart_profiles(
        &self,
        acting: &Uuid,
        edges: &[RelationshipEdgeEntity],
    ) -> Result<HashMap<Uuid, AccountSummary>, error::SystemError> {
        let ids: Vec<Uuid> = edges.iter().map(|e| e.other_side(acting)).collect();
        let summaries = self.accounts.find_summaries_by_ids(&ids).await?;
        Ok(summaries.into_iter().map(|s| (s.id, s)).collect())
    }

    /// A conditional write on `edge` failed, or the edge had already moved
    /// past pending by the time it was loaded. The acting side wants the
    /// outcome, not the write failure, so re-read the pair once and report
    /// what actually holds now.
    async fn resolve_after_lost_race(
        &self,
        acting: Uuid,
        edge: &RelationshipEdgeEntity,
    ) -> Result<FriendshipView, error::SystemError> {
        let other = edge.other_side(&acting);
        debug!(
            "conditional write on edge {} lost a race, re-reading pair {} / {}",
            edge.id, acting, other
        );
        self.check_status(acting, other).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::SystemError;
    use crate::modules::account::repository_mem::AccountRepositoryMem;
    use crate::modules::relationship::model::PendingRequestView;
    use crate::modules::relationship::repository_mem::RelationshipStoreMem;

    struct Fixture {
        service: RelationshipService<RelationshipStoreMem, AccountRepositoryMem>,
        store: Arc<RelationshipStoreMem>,
        alice: Uuid,
        bob: Uuid,
    }

    fn fixture() -> Fixture {
        let accounts = Arc::new(AccountRepositoryMem::new());
        let alice = accounts.add("alice");
        let bob = accounts.add("bob");
        let store = Arc::new(RelationshipStoreMem::new());
        let service = RelationshipService::with_dependencies(Arc::clone(&store), accounts);
        Fixture { service, store, alice, bob }
    }

    #[actix_web::test]
    async fn absent_edge_reports_neither_friend_nor_pending() {
        let f = fixture();
        let view = f.service.check_status(f.alice, f.bob).await.unwrap();
        assert_eq!(view, FriendshipView::none());
    }

    #[actix_web::test]
    async fn pending_views_mirror_each_other() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();

        let from_alice = f.service.check_status(f.alice, f.bob).await.unwrap();
        let from_bob = f.service.check_status(f.bob, f.alice).await.unwrap();

        let outgoing = from_alice.pending.unwrap();
        let incoming = from_bob.pending.unwrap();
        assert!(!outgoing.is_incoming);
        assert!(incoming.is_incoming);
        assert_eq!(outgoing.edge_id, edge.id);
        assert_eq!(incoming.edge_id, edge.id);
        assert!(!from_alice.is_friend);
        assert!(!from_bob.is_friend);
    }

    #[actix_web::test]
    async fn send_to_self_is_rejected_before_the_store() {
        let f = fixture();
        let err = f.service.send_request(f.alice, f.alice).await.unwrap_err();
        assert!(matches!(err, SystemError::BadRequest(_)));
        assert_eq!(f.store.edge_count(), 0);
    }

    #[actix_web::test]
    async fn send_to_unknown_account_is_not_found() {
        let f = fixture();
        let err = f.service.send_request(f.alice, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn second_send_conflicts_in_either_direction() {
        let f = fixture();
        f.service.send_request(f.alice, f.bob).await.unwrap();

        let repeat = f.service.send_request(f.alice, f.bob).await.unwrap_err();
        assert!(matches!(repeat, SystemError::Conflict(_)));

        let reversed = f.service.send_request(f.bob, f.alice).await.unwrap_err();
        assert!(matches!(reversed, SystemError::Conflict(_)));

        assert_eq!(f.store.edge_count(), 1);
    }

    #[actix_web::test]
    async fn send_between_friends_conflicts() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();
        f.service.accept_request(f.bob, edge.id).await.unwrap();

        let err = f.service.send_request(f.alice, f.bob).await.unwrap_err();
        assert!(matches!(err, SystemError::Conflict(_)));
    }

    #[actix_web::test]
    async fn accept_makes_both_sides_friends() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();

        let view = f.service.accept_request(f.bob, edge.id).await.unwrap();
        assert_eq!(view, FriendshipView::friends());

        let from_alice = f.service.check_status(f.alice, f.bob).await.unwrap();
        let from_bob = f.service.check_status(f.bob, f.alice).await.unwrap();
        assert!(from_alice.is_friend && from_bob.is_friend);
        assert!(from_alice.pending.is_none() && from_bob.pending.is_none());
    }

    #[actix_web::test]
    async fn requester_cannot_accept_or_decline_their_own_request() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();

        let accept = f.service.accept_request(f.alice, edge.id).await.unwrap_err();
        assert!(matches!(accept, SystemError::Forbidden(_)));

        let decline = f.service.decline_request(f.alice, edge.id).await.unwrap_err();
        assert!(matches!(decline, SystemError::Forbidden(_)));
    }

    #[actix_web::test]
    async fn only_the_sender_can_cancel() {
        let f = fixture();
        let outsider = Uuid::now_v7();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();

        let by_target = f.service.cancel_request(f.bob, edge.id).await.unwrap_err();
        assert!(matches!(by_target, SystemError::Forbidden(_)));

        let by_outsider = f.service.cancel_request(outsider, edge.id).await.unwrap_err();
        assert!(matches!(by_outsider, SystemError::Forbidden(_)));

        let view = f.service.cancel_request(f.alice, edge.id).await.unwrap();
        assert_eq!(view, FriendshipView::none());
    }

    #[actix_web::test]
    async fn decline_deletes_and_a_new_send_creates_a_fresh_edge() {
        let f = fixture();
        let first = f.service.send_request(f.alice, f.bob).await.unwrap();
        f.service.decline_request(f.bob, first.id).await.unwrap();

        assert_eq!(f.store.edge_count(), 0);

        let second = f.service.send_request(f.alice, f.bob).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[actix_web::test]
    async fn decline_after_a_won_accept_reports_friends_not_an_error() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();

        f.service.accept_request(f.bob, edge.id).await.unwrap();

        // The decline arrives after the accept committed; the caller learns
        // the resolved outcome instead of a stale-write error.
        let view = f.service.decline_request(f.bob, edge.id).await.unwrap();
        assert_eq!(view, FriendshipView::friends());
        assert_eq!(f.store.edge_count(), 1);
    }

    #[actix_web::test]
    async fn concurrent_accept_and_decline_converge_on_one_outcome() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();

        let (accepted, declined) = tokio::join!(
            f.service.accept_request(f.bob, edge.id),
            f.service.decline_request(f.bob, edge.id),
        );

        let authoritative = f.service.check_status(f.bob, f.alice).await.unwrap();
        assert!(authoritative.pending.is_none());

        // Whichever call lost reports the same resolved state the winner
        // produced; the request-missing case (loser started after the
        // winner deleted the edge) surfaces as NotFound.
        for outcome in [accepted, declined] {
            match outcome {
                Ok(view) => assert_eq!(view, authoritative),
                Err(e) => assert!(matches!(e, SystemError::NotFound(_))),
            }
        }
    }

    #[actix_web::test]
    async fn cancel_after_accept_reports_friends() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();
        f.service.accept_request(f.bob, edge.id).await.unwrap();

        let view = f.service.cancel_request(f.alice, edge.id).await.unwrap();
        assert_eq!(view, FriendshipView::friends());
    }

    #[actix_web::test]
    async fn accept_of_a_deleted_request_is_not_found() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();
        f.service.cancel_request(f.alice, edge.id).await.unwrap();

        let err = f.service.accept_request(f.bob, edge.id).await.unwrap_err();
        assert!(matches!(err, SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn unfriend_twice_succeeds_both_times() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();
        f.service.accept_request(f.bob, edge.id).await.unwrap();

        f.service.unfriend(f.alice, f.bob).await.unwrap();
        f.service.unfriend(f.bob, f.alice).await.unwrap();

        assert_eq!(f.store.edge_count(), 0);
        let view = f.service.check_status(f.alice, f.bob).await.unwrap();
        assert_eq!(view, FriendshipView::none());
    }

    #[actix_web::test]
    async fn unfriend_does_not_touch_pending_requests() {
        let f = fixture();
        f.service.send_request(f.alice, f.bob).await.unwrap();

        f.service.unfriend(f.alice, f.bob).await.unwrap();

        // The pending request survives; only accepted edges are unfriended.
        assert_eq!(f.store.edge_count(), 1);
        let view = f.service.check_status(f.bob, f.alice).await.unwrap();
        assert!(view.pending.is_some());
    }

    #[actix_web::test]
    async fn lists_reflect_the_lifecycle() {
        let f = fixture();
        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();

        let alice_requests = f.service.list_requests(f.alice).await.unwrap();
        assert_eq!(alice_requests.len(), 1);
        assert!(!alice_requests[0].is_incoming);

        let bob_requests = f.service.list_requests(f.bob).await.unwrap();
        assert_eq!(bob_requests.len(), 1);
        assert!(bob_requests[0].is_incoming);
        assert_eq!(bob_requests[0].account.username, "alice");

        f.service.accept_request(f.bob, edge.id).await.unwrap();

        assert!(f.service.list_requests(f.alice).await.unwrap().is_empty());
        let friends = f.service.list_friends(f.alice).await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].account.username, "bob");
    }

    #[actix_web::test]
    async fn full_lifecycle_scenario() {
        let f = fixture();

        let edge = f.service.send_request(f.alice, f.bob).await.unwrap();

        let seen_by_bob = f.service.check_status(f.bob, f.alice).await.unwrap();
        assert_eq!(
            seen_by_bob.pending,
            Some(PendingRequestView { edge_id: edge.id, is_incoming: true })
        );

        f.service.accept_request(f.bob, edge.id).await.unwrap();
        assert!(f.service.check_status(f.alice, f.bob).await.unwrap().is_friend);
        assert!(f.service.check_status(f.bob, f.alice).await.unwrap().is_friend);

        f.service.unfriend(f.alice, f.bob).await.unwrap();
        assert_eq!(f.service.check_status(f.alice, f.bob).await.unwrap(), FriendshipView::none());
        assert_eq!(f.service.check_status(f.bob, f.alice).await.unwrap(), FriendshipView::none());
    }
}
