#![allow(dead_code)]
use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::api::error;
use crate::modules::account::repository::AccountRepository;

use crate::modules::relationship::{
    model::{FriendshipView, PendingRequestView},
    repository::RelationshipStore,
    schema::RelationshipEdgeEntity,
    service::RelationshipService,
};

/// Session-local cache of friendship views, keyed by the other account.
/// Owned by exactly one client session and never shared, so it carries no
/// locking. It never originates state: every entry is a copy of what the
/// service reported.
#[derive(Debug, Default)]
pub struct StatusCache {
    entries: HashMap<Uuid, FriendshipView>,
}

impl StatusCache {
    pub fn get(&self, other: &Uuid) -> Option<&FriendshipView> {
        self.entries.get(other)
    }

    pub fn put(&mut self, other: Uuid, view: FriendshipView) {
        self.entries.insert(other, view);
    }

    pub fn invalidate(&mut self, other: &Uuid) {
        self.entries.remove(other);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One authenticated client session's window onto the relationship service.
/// Reads go through the cache; every successful mutation rewrites the entry
/// for the affected account before returning, so a follow-up `status` call
/// within the session needs no round trip.
pub struct RelationshipSession<S, A>
where
    S: RelationshipStore,
    A: AccountRepository,
{
    acting: Uuid,
    service: Arc<RelationshipService<S, A>>,
    cache: StatusCache,
}

impl<S, A> RelationshipSession<S, A>
where
    S: RelationshipStore,
    A: AccountRepository,
{
    pub fn new(acting: Uuid, service: Arc<RelationshipService<S, A>>) -> Self {
        RelationshipSession { acting, service, cache: StatusCache::default() }
    }

    pub fn acting(&self) -> Uuid {
        self.acting
    }

    pub async fn status(&mut self, other: Uuid) -> Result<FriendshipView, error::SystemError> {
        if let Some(view) = self.cache.get(&other) {
            tracing::debug!("status cache hit: {} -> {}", self.acting, other);
            return Ok(view.clone());
        }

        let view = self.service.check_status(self.acting, other).await?;
        self.cache.put(other, view.clone());
        Ok(view)
    }

    pub async fn send(
        &mut self,
        other: Uuid,
    ) -> Result<RelationshipEdgeEntity, error::SystemError> {
        let edge = self.service.send_request(self.acting, other).await?;
        self.cache.put(
            other,
            FriendshipView {
                is_friend: false,
                pending: Some(PendingRequestView { edge_id: edge.id, is_incoming: false }),
            },
        );
        Ok(edge)
    }

    pub async fn accept(
        &mut self,
        other: Uuid,
        edge_id: Uuid,
    ) -> Result<FriendshipView, error::SystemError> {
        let view = self.service.accept_request(self.acting, edge_id).await?;
        self.cache.put(other, view.clone());
        Ok(view)
    }

    pub async fn decline(
        &mut self,
        other: Uuid,
        edge_id: Uuid,
    ) -> Result<FriendshipView, error::SystemError> {
        let view = self.service.decline_request(self.acting, edge_id).await?;
        self.cache.put(other, view.clone());
        Ok(view)
    }

    pub async fn cancel(
        &mut self,
        other: Uuid,
        edge_id: Uuid,
    ) -> Result<FriendshipView, error::SystemError> {
        let view = self.service.cancel_request(self.acting, edge_id).await?;
        self.cache.put(other, view.clone());
        Ok(view)
    }

    pub async fn unfriend(&mut self, other: Uuid) -> Result<(), error::SystemError> {
        self.service.unfriend(self.acting, other).await?;
        self.cache.put(other, FriendshipView::none());
        Ok(())
    }

    /// Drop the cached entry for one account and re-read it.
    pub async fn refresh(&mut self, other: Uuid) -> Result<FriendshipView, error::SystemError> {
        self.cache.invalidate(&other);
        self.status(other).await
    }

    /// Wholesale invalidation, for when the caller re-enters the view that
    /// owns this session.
    pub fn reset(&mut self) {
        tracing::debug!("resetting status cache for session of {}", self.acting);
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::account::repository_mem::AccountRepositoryMem;
    use crate::modules::relationship::repository_mem::RelationshipStoreMem;

    type TestService = RelationshipService<RelationshipStoreMem, AccountRepositoryMem>;

    fn service_with_accounts() -> (Arc<TestService>, Uuid, Uuid) {
        let accounts = Arc::new(AccountRepositoryMem::new());
        let alice = accounts.add("alice");
        let bob = accounts.add("bob");
        let store = Arc::new(RelationshipStoreMem::new());
        let service = Arc::new(RelationshipService::with_dependencies(store, accounts));
        (service, alice, bob)
    }

    #[actix_web::test]
    async fn warm_entries_are_served_without_a_round_trip() {
        let (service, alice, bob) = service_with_accounts();
        let mut alice_session = RelationshipSession::new(alice, Arc::clone(&service));

        let initial = alice_session.status(bob).await.unwrap();
        assert_eq!(initial, FriendshipView::none());

        // Authoritative state changes behind the session's back; the warm
        // cache keeps answering with the copy it holds.
        service.send_request(bob, alice).await.unwrap();
        let cached = alice_session.status(bob).await.unwrap();
        assert_eq!(cached, FriendshipView::none());

        let refreshed = alice_session.refresh(bob).await.unwrap();
        assert!(refreshed.pending.is_some());
    }

    #[actix_web::test]
    async fn send_rewrites_the_entry_optimistically() {
        let (service, alice, bob) = service_with_accounts();
        let mut session = RelationshipSession::new(alice, Arc::clone(&service));

        let edge = session.send(bob).await.unwrap();

        let view = session.status(bob).await.unwrap();
        assert_eq!(
            view.pending,
            Some(PendingRequestView { edge_id: edge.id, is_incoming: false })
        );
        // The rewritten entry matches what the service would report.
        assert_eq!(view, service.check_status(alice, bob).await.unwrap());
    }

    #[actix_web::test]
    async fn accept_leaves_the_session_seeing_friends() {
        let (service, alice, bob) = service_with_accounts();
        let mut alice_session = RelationshipSession::new(alice, Arc::clone(&service));
        let mut bob_session = RelationshipSession::new(bob, Arc::clone(&service));

        let edge = alice_session.send(bob).await.unwrap();
        let view = bob_session.accept(alice, edge.id).await.unwrap();
        assert_eq!(view, FriendshipView::friends());
        assert_eq!(bob_session.status(alice).await.unwrap(), FriendshipView::friends());

        // Alice's session still holds her pre-accept copy until refreshed.
        assert!(alice_session.status(bob).await.unwrap().pending.is_some());
        assert_eq!(alice_session.refresh(bob).await.unwrap(), FriendshipView::friends());
    }

    #[actix_web::test]
    async fn failed_mutations_leave_the_cache_untouched() {
        let (service, alice, bob) = service_with_accounts();
        let mut session = RelationshipSession::new(bob, Arc::clone(&service));

        let edge = service.send_request(alice, bob).await.unwrap();
        assert!(session.status(alice).await.unwrap().pending.is_some());

        // Wrong actor: bob cannot cancel alice's request.
        session.cancel(alice, edge.id).await.unwrap_err();
        assert!(session.status(alice).await.unwrap().pending.is_some());
    }

    #[actix_web::test]
    async fn unfriend_and_reset_clear_state() {
        let (service, alice, bob) = service_with_accounts();
        let mut session = RelationshipSession::new(alice, Arc::clone(&service));

        let edge = session.send(bob).await.unwrap();
        service.accept_request(bob, edge.id).await.unwrap();
        session.refresh(bob).await.unwrap();

        session.unfriend(bob).await.unwrap();
        assert_eq!(session.status(bob).await.unwrap(), FriendshipView::none());

        // After a wholesale reset the next read goes back to the service.
        service.send_request(bob, alice).await.unwrap();
        assert_eq!(session.status(bob).await.unwrap(), FriendshipView::none());
        session.reset();
        assert!(session.status(bob).await.unwrap().pending.is_some());
    }
}
