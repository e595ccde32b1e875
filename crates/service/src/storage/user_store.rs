use std::sync::Arc;

use configs::StorageConfig;
use tracing::{debug, error, info, instrument};

use super::{BackendKind, FileBackend, ObjectBackend, RelationalBackend, StorageError, UserBackend};
use crate::{metrics, User};

/// Persistence façade handed to the HTTP layer.
///
/// Bound to exactly one backend, chosen by [`BackendKind::select`] when the
/// store is built; the choice does not change for the store's lifetime.
#[derive(Clone)]
pub struct UserStore {
    backend: Arc<dyn UserBackend>,
}

impl UserStore {
    /// Build only the backend selected by `cfg`.
    pub async fn from_config(cfg: &StorageConfig) -> Result<Self, StorageError> {
        let kind = BackendKind::select(cfg);
        let backend: Arc<dyn UserBackend> = match kind {
            BackendKind::Relational => {
                let url = cfg.database_url.as_deref().unwrap_or_default();
                Arc::new(RelationalBackend::connect(url).await?)
            }
            BackendKind::Object => Arc::new(ObjectBackend::new(&cfg.blob)),
            BackendKind::File => Arc::new(FileBackend::new(cfg.data_file.clone())),
        };
        info!(backend = %kind, "user store backend selected");
        Ok(Self::with_backend(backend))
    }

    pub fn with_backend(backend: Arc<dyn UserBackend>) -> Self {
        Self { backend }
    }

    pub fn kind(&self) -> BackendKind { self.backend.kind() }

    #[instrument(name = "user_store.read_all", skip(self), fields(backend = %self.kind()))]
    pub async fn read_all(&self) -> Result<Vec<User>, StorageError> {
        let kind = self.kind();
        metrics::STORE_READS_TOTAL.with_label_values(&[kind.as_str()]).inc();
        match self.backend.read_all().await {
            Ok(users) => {
                debug!(count = users.len(), "users read");
                Ok(users)
            }
            Err(e) => {
                metrics::STORE_ERRORS_TOTAL.with_label_values(&[kind.as_str(), "read"]).inc();
                error!(error = %e, "user store read failed");
                Err(e)
            }
        }
    }

    #[instrument(name = "user_store.write_all", skip(self, users), fields(backend = %self.kind(), count = users.len()))]
    pub async fn write_all(&self, users: &[User]) -> Result<(), StorageError> {
        let kind = self.kind();
        metrics::STORE_WRITES_TOTAL.with_label_values(&[kind.as_str()]).inc();
        if let Err(e) = self.backend.write_all(users).await {
            metrics::STORE_ERRORS_TOTAL.with_label_values(&[kind.as_str(), "write"]).inc();
            error!(error = %e, "user store write failed");
            return Err(e);
        }
        Ok(())
    }
}
