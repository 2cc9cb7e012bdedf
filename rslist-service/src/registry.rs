//! Registration of users and events.
//!
//! Both are owned outside the ranking rules; this is the thin path the
//! daemon uses to create them.

use std::sync::Arc;
use tracing::info;

use rslist_domain::{Event, User, UserId};
use rslist_store::Store;

use crate::error::{ServiceError, ServiceResult};

/// Creates users and events.
pub struct Registry<S: Store> {
    store: Arc<S>,
}

impl<S: Store> Registry<S> {
    /// Create a new registry.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a user with a starting vote budget.
    pub async fn register_user(
        &self,
        user_name: &str,
        email: Option<String>,
        vote_budget: u32,
    ) -> ServiceResult<User> {
        let user = User::new(user_name, email, vote_budget)?;
        self.store.users().save(&user).await?;

        info!(user_id = %user.id, vote_budget, "User registered");
        Ok(user)
    }

    /// Submit a new, unranked event on behalf of an existing user.
    pub async fn submit_event(
        &self,
        user_id: UserId,
        name: &str,
        keyword: &str,
    ) -> ServiceResult<Event> {
        if self.store.users().find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::UserNotFound(user_id));
        }

        let event = Event::new(user_id, name, keyword)?;
        self.store.events().save(&event).await?;

        info!(event_id = %event.id, %user_id, "Event submitted");
        Ok(event)
    }
}
