//! JSON payload shared by the file and object backends.

use tracing::warn;

use crate::User;

/// Parse a stored payload. Anything that is not a JSON array of users yields
/// an empty collection.
pub fn decode_users(bytes: &[u8]) -> Vec<User> {
    match serde_json::from_slice::<Vec<User>>(bytes) {
        Ok(users) => users,
        Err(e) => {
            warn!(error = %e, len = bytes.len(), "stored users payload is malformed; using empty collection");
            Vec::new()
        }
    }
}

/// Pretty-printed (2-space) JSON array.
pub fn encode_users(users: &[User]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(users)
}
