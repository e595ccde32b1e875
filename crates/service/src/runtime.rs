//! Runtime environment helpers
//!
//! Startup checks that depend on which storage backend will be used.

use configs::StorageConfig;

use crate::storage::BackendKind;

/// Ensure the local data directory exists when the file backend is selected.
pub async fn ensure_env(cfg: &StorageConfig) -> anyhow::Result<BackendKind> {
    let kind = BackendKind::select(cfg);
    if kind == BackendKind::File {
        common::env::ensure_data_dir(&cfg.data_file).await?;
    }
    Ok(kind)
}
