use std::sync::Arc;

use tokio::sync::RwLock;

use models::user::NewUser;
use service::{storage::UserStore, user_service::next_id, User};

#[derive(Clone)]
pub struct AppState {
    /// Durable users behind the form flow.
    pub store: UserStore,
    /// Scratch users behind `/api/users`.
    pub memory: MemoryUsers,
}

impl AppState {
    pub fn new(store: UserStore) -> Self {
        Self { store, memory: MemoryUsers::default() }
    }
}

/// Process-scoped user list for the JSON API.
///
/// Lives only as long as the process and is never written to the user store;
/// a restart starts from an empty list.
#[derive(Clone, Default)]
pub struct MemoryUsers {
    inner: Arc<RwLock<Vec<User>>>,
}

impl MemoryUsers {
    pub async fn list(&self) -> Vec<User> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, id: i32) -> Option<User> {
        self.inner.read().await.iter().find(|u| u.id == id).cloned()
    }

    /// `None` when no positive id is left to assign.
    pub async fn create(&self, input: NewUser) -> Option<User> {
        let mut users = self.inner.write().await;
        let user = input.into_user(next_id(&users)?);
        users.push(user.clone());
        Some(user)
    }

    /// Replace name and email of an existing user; `None` when absent.
    pub async fn replace(&self, id: i32, input: NewUser) -> Option<User> {
        let mut users = self.inner.write().await;
        let slot = users.iter_mut().find(|u| u.id == id)?;
        *slot = input.into_user(id);
        Some(slot.clone())
    }

    pub async fn delete(&self, id: i32) -> bool {
        let mut users = self.inner.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }
}
