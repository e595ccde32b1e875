use tracing::{info, instrument};

use models::user::NewUser;
use crate::{errors::ServiceError, storage::UserStore, User};

/// Next id for a collection: one past the largest id, or 1 when empty.
///
/// Ids are always positive; `None` once the largest stored id is `i32::MAX`.
pub fn next_id(users: &[User]) -> Option<i32> {
    let max = users.iter().map(|u| u.id).max().unwrap_or(0).max(0);
    max.checked_add(1)
}

/// All stored users.
pub async fn list_users(store: &UserStore) -> Result<Vec<User>, ServiceError> {
    Ok(store.read_all().await?)
}

/// Validate `input`, append it to the stored collection and write the
/// collection back.
///
/// Read, append and write are separate steps with no lock or version check.
/// Two concurrent calls may read the same snapshot, and whichever writes last
/// replaces the other's record: one registration is lost.
#[instrument(skip(store, input), fields(backend = %store.kind()))]
pub async fn register_user(store: &UserStore, input: NewUser) -> Result<User, ServiceError> {
    input.validate()?;
    let mut users = store.read_all().await?;
    let id = next_id(&users).ok_or(ServiceError::IdsExhausted)?;
    let user = input.into_user(id);
    users.push(user.clone());
    store.write_all(&users).await?;
    info!(user_id = user.id, total = users.len(), "user registered");
    Ok(user)
}
