use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::NewUser;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::UserRepository;

/// Process-local credential store.
///
/// Used by tests and local runs without a database. Cloning shares the
/// underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: HashMap<UserId, User>,
    ids_by_email: HashMap<EmailAddress, UserId>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, AccountError> {
        // Uniqueness check and insert happen under the same write guard
        let mut state = self.state.write().await;

        if state.ids_by_email.contains_key(&user.email) {
            return Err(AccountError::DuplicateEmail(user.email.to_string()));
        }

        state.last_id += 1;
        let user = user.with_id(UserId(state.last_id));

        state.ids_by_email.insert(user.email.clone(), user.id);
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AccountError> {
        let state = self.state.read().await;

        Ok(state
            .ids_by_email
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }
}
