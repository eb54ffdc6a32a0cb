//! In-process user store.
//!
//! Enforces the same uniqueness rule as the `PostgreSQL` store, under a
//! single write lock, so it is safe to share between tasks.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use jungle_core::{NormalizedEmail, UserId};

use super::{NewUserRecord, RepositoryError, UserRecordUpdate, UserStore};
use crate::models::{StoredUser, User};

#[derive(Default)]
struct MemoryState {
    last_id: i32,
    users: HashMap<UserId, StoredUser>,
    by_email: HashMap<NormalizedEmail, UserId>,
}

impl MemoryState {
    fn next_id(&mut self) -> Result<UserId, RepositoryError> {
        self.last_id = self.last_id.checked_add(1).ok_or_else(|| {
            RepositoryError::DataCorruption("user id sequence exhausted".to_owned())
        })?;
        Ok(UserId::new(self.last_id))
    }

    fn email_owner(&self, email: &NormalizedEmail) -> Option<UserId> {
        self.by_email.get(email).copied()
    }
}

/// User store backed by a map in memory.
#[derive(Default)]
pub struct MemoryUserStore {
    state: RwLock<MemoryState>,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Returns `true` if no users are stored.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, record: NewUserRecord) -> Result<User, RepositoryError> {
        let mut state = self.state.write().await;

        if state.email_owner(&record.normalized_email).is_some() {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = state.next_id()?;
        let now = Utc::now();
        let user = User {
            id,
            name: record.name,
            email: record.email,
            normalized_email: record.normalized_email,
            created_at: now,
            updated_at: now,
        };

        state.by_email.insert(user.normalized_email.clone(), id);
        state.users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password_hash: record.password_hash,
            },
        );

        Ok(user)
    }

    async fn find_by_normalized_email(
        &self,
        email: &NormalizedEmail,
    ) -> Result<Option<StoredUser>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .email_owner(email)
            .and_then(|id| state.users.get(&id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<StoredUser>, RepositoryError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn update(&self, id: UserId, update: UserRecordUpdate) -> Result<User, RepositoryError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if state
            .email_owner(&update.normalized_email)
            .is_some_and(|owner| owner != id)
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let stored = state.users.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        let previous_email = std::mem::replace(
            &mut stored.user.normalized_email,
            update.normalized_email.clone(),
        );
        stored.user.name = update.name;
        stored.user.email = update.email;
        stored.user.updated_at = Utc::now();
        if let Some(password_hash) = update.password_hash {
            stored.password_hash = password_hash;
        }
        let user = stored.user.clone();

        state.by_email.remove(&previous_email);
        state.by_email.insert(update.normalized_email, id);

        Ok(user)
    }
}
