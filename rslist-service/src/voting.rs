//! Voting: move part of a user's budget onto an event's score.

use std::sync::Arc;
use tracing::{info, warn};

use rslist_domain::VoteCommand;
use rslist_engine::{cast_vote, EngineError};
use rslist_store::Store;

use crate::error::{InvalidVoteReason, ServiceError, ServiceResult};

/// Applies votes.
pub struct VoteService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> VoteService<S> {
    /// Create a new vote service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Cast a vote.
    ///
    /// Event, voter and budget are all checked before anything is written;
    /// the vote record, debit and credit are then committed as one unit.
    pub async fn vote(&self, command: VoteCommand) -> ServiceResult<()> {
        let VoteCommand {
            user_id,
            event_id,
            quantity,
            voted_at,
        } = command;

        let event = self.store.events().find_by_id(event_id).await?;
        let user = self.store.users().find_by_id(user_id).await?;

        let (event, user) = match (event, user) {
            (Some(event), Some(user)) => (event, user),
            (None, _) => return Err(reject(InvalidVoteReason::EventNotFound(event_id))),
            (_, None) => return Err(reject(InvalidVoteReason::UserNotFound(user_id))),
        };

        let cast = match cast_vote(&user, &event, quantity, voted_at) {
            Ok(cast) => cast,
            Err(EngineError::InsufficientBudget { requested, remaining }) => {
                return Err(reject(InvalidVoteReason::InsufficientBudget { requested, remaining }));
            },
            Err(other) => return Err(other.into()),
        };

        self.store.commit_vote(&cast).await?;

        info!(
            %user_id,
            %event_id,
            quantity,
            remaining_budget = cast.user.vote_budget,
            vote_num = cast.event.vote_num,
            "Vote accepted"
        );
        Ok(())
    }
}

fn reject(reason: InvalidVoteReason) -> ServiceError {
    warn!(%reason, "Vote rejected");
    ServiceError::InvalidVote(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rslist_domain::{Event, User};
    use rslist_store::{EventRepository, MemoryStore, UserRepository};
    use uuid::Uuid;

    async fn setup(budget: u32, votes: u64) -> (Arc<MemoryStore>, User, Event) {
        let store = Arc::new(MemoryStore::new());
        let user = User::new("xiaoli", None, budget).unwrap();
        let mut event = Event::new(user.id, "event name", "keyword").unwrap();
        event.vote_num = votes;
        UserRepository::save(store.as_ref(), &user).await.unwrap();
        EventRepository::save(store.as_ref(), &event).await.unwrap();
        (store, user, event)
    }

    fn command(user: &User, event: &Event, quantity: u32) -> VoteCommand {
        VoteCommand {
            user_id: user.id,
            event_id: event.id,
            quantity,
            voted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_vote_success() {
        let (store, user, event) = setup(5, 2).await;
        let service = VoteService::new(store.clone());

        service.vote(command(&user, &event, 2)).await.unwrap();

        let user = UserRepository::find_by_id(store.as_ref(), user.id).await.unwrap().unwrap();
        let event = EventRepository::find_by_id(store.as_ref(), event.id).await.unwrap().unwrap();
        assert_eq!(user.vote_budget, 3);
        assert_eq!(event.vote_num, 4);
        assert_eq!(store.vote_count(), 1);
    }

    #[tokio::test]
    async fn test_vote_unknown_event() {
        let (store, user, _) = setup(5, 0).await;
        let service = VoteService::new(store.clone());
        let ghost_id = Uuid::now_v7();

        let result = service
            .vote(VoteCommand {
                user_id: user.id,
                event_id: ghost_id,
                quantity: 1,
                voted_at: Utc::now(),
            })
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::InvalidVote(InvalidVoteReason::EventNotFound(id))) if id == ghost_id
        ));
        assert_eq!(store.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_vote_unknown_user() {
        let (store, _, event) = setup(5, 0).await;
        let service = VoteService::new(store.clone());

        let result = service
            .vote(VoteCommand {
                user_id: Uuid::now_v7(),
                event_id: event.id,
                quantity: 1,
                voted_at: Utc::now(),
            })
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::InvalidVote(InvalidVoteReason::UserNotFound(_)))
        ));
        assert_eq!(store.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_vote_over_budget_leaves_state_untouched() {
        let (store, user, event) = setup(5, 2).await;
        let service = VoteService::new(store.clone());

        let result = service.vote(command(&user, &event, 6)).await;

        assert!(matches!(
            result,
            Err(ServiceError::InvalidVote(InvalidVoteReason::InsufficientBudget {
                requested: 6,
                remaining: 5
            }))
        ));
        let user = UserRepository::find_by_id(store.as_ref(), user.id).await.unwrap().unwrap();
        let event = EventRepository::find_by_id(store.as_ref(), event.id).await.unwrap().unwrap();
        assert_eq!(user.vote_budget, 5);
        assert_eq!(event.vote_num, 2);
        assert_eq!(store.vote_count(), 0);
    }
}
