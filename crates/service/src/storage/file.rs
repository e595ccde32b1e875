use std::{io::ErrorKind, path::{Path, PathBuf}};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use super::{codec, BackendKind, StorageError, UserBackend};
use crate::User;

/// Users persisted as a JSON array in a local file.
///
/// The file (and its parent directory) is created with an empty array on any
/// read that finds it missing. Writes replace the whole file in one call.
#[derive(Clone, Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    async fn ensure_exists(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&self.path, codec::encode_users(&[])?).await?;
                debug!(path = %self.path.display(), "created empty users file");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl UserBackend for FileBackend {
    fn kind(&self) -> BackendKind { BackendKind::File }

    async fn read_all(&self) -> Result<Vec<User>, StorageError> {
        self.ensure_exists().await?;
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(codec::decode_users(&bytes)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "users file unreadable; using empty collection");
                Ok(Vec::new())
            }
        }
    }

    async fn write_all(&self, users: &[User]) -> Result<(), StorageError> {
        let data = codec::encode_users(users)?;
        fs::write(&self.path, data).await?;
        debug!(path = %self.path.display(), count = users.len(), "users file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("svc_users_{}", Uuid::new_v4())).join("data").join("users.json")
    }

    fn user(id: i32, name: &str) -> User {
        User { id, name: name.into(), email: format!("{name}@example.com") }
    }

    #[tokio::test]
    async fn first_read_bootstraps_empty_file() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let backend = FileBackend::new(&path);

        assert!(backend.read_all().await?.is_empty());
        assert_eq!(tokio::fs::read_to_string(&path).await?, "[]");

        // repeated reads are idempotent
        assert!(backend.read_all().await?.is_empty());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap().parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn round_trip_preserves_ids_and_order() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let backend = FileBackend::new(&path);
        let users = vec![user(5, "eve"), user(2, "bob"), user(9, "ivy")];

        backend.write_all(&users).await?;
        assert_eq!(backend.read_all().await?, users);

        let text = tokio::fs::read_to_string(&path).await?;
        assert!(text.starts_with("[\n  {\n    \"id\": 5,"));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap().parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupted_content_reads_as_empty() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let backend = FileBackend::new(&path);
        backend.read_all().await?;

        tokio::fs::write(&path, "{ definitely not json").await?;
        assert!(backend.read_all().await?.is_empty());

        tokio::fs::write(&path, r#"{"id": 1, "name": "a", "email": "b"}"#).await?;
        assert!(backend.read_all().await?.is_empty());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap().parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn setup_failure_propagates() -> Result<(), anyhow::Error> {
        // parent "directory" is a regular file, so create_dir_all fails
        let blocker = std::env::temp_dir().join(format!("svc_blocker_{}", Uuid::new_v4()));
        tokio::fs::write(&blocker, "x").await?;
        let backend = FileBackend::new(blocker.join("users.json"));

        let err = backend.read_all().await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));

        let _ = tokio::fs::remove_file(&blocker).await;
        Ok(())
    }
}
