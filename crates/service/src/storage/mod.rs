//! Persistence for the user collection.
//!
//! Every backend stores the *whole* collection: reads return the full list and
//! writes replace it. There is no per-record update primitive, so a
//! read-append-write cycle run by two callers at once can lose one of the
//! appends (see [`crate::user_service::register_user`]).
//!
//! Malformed or absent stored content always degrades to an empty collection;
//! only setup, transport, auth and SQL failures surface as [`StorageError`].

use async_trait::async_trait;
use thiserror::Error;

pub mod codec;
pub mod file;
pub mod object;
pub mod relational;
pub mod selection;
pub mod user_store;

pub use file::FileBackend;
pub use object::ObjectBackend;
pub use relational::RelationalBackend;
pub use selection::BackendKind;
pub use user_store::UserStore;

use crate::User;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(String),
    #[error("object store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("database error: {0}")]
    Db(String),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self { Self::Http(e.to_string()) }
}

/// Read/write contract shared by the file, object and relational backends.
#[async_trait]
pub trait UserBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Full collection. Never fails on malformed content.
    async fn read_all(&self) -> Result<Vec<User>, StorageError>;

    /// Replace the stored collection with `users`.
    async fn write_all(&self, users: &[User]) -> Result<(), StorageError>;
}
