use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

use common::env::env_flag;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Inputs for choosing and building the user storage backend.
///
/// Each optional section only signals that a backend is configured; the
/// priority between them is decided by the service layer.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Relational connection string; presence selects the relational backend.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub blob: BlobConfig,
    /// Running in a deployed environment where the local disk is not durable.
    #[serde(default)]
    pub deployed: bool,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { database_url: None, blob: BlobConfig::default(), deployed: false, data_file: default_data_file() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_blob_api_url")]
    pub api_url: String,
    #[serde(default = "default_blob_prefix")]
    pub prefix: String,
    #[serde(default = "default_blob_key")]
    pub key: String,
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_blob_api_url(),
            prefix: default_blob_prefix(),
            key: default_blob_key(),
            list_limit: default_list_limit(),
        }
    }
}

fn default_data_file() -> PathBuf { PathBuf::from("data/users.json") }
fn default_blob_api_url() -> String { "https://blob.vercel-storage.com".into() }
fn default_blob_prefix() -> String { "users".into() }
fn default_blob_key() -> String { "users.json".into() }
fn default_list_limit() -> u32 { 10 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then overlay the environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Fill unset values from the process environment.
    pub fn normalize_from_env(&mut self) {
        if is_blank(&self.database_url) {
            self.database_url = non_empty_var("DATABASE_URL").or_else(|| non_empty_var("POSTGRES_URL"));
        }
        if is_blank(&self.blob.token) {
            self.blob.token = non_empty_var("BLOB_READ_WRITE_TOKEN");
        }
        if let Some(url) = non_empty_var("BLOB_API_URL") {
            self.blob.api_url = url;
        }
        if let Some(path) = non_empty_var("USERS_FILE") {
            self.data_file = PathBuf::from(path);
        }
        self.deployed = self.deployed || env_flag("DEPLOYED") || env_flag("VERCEL");
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_file must not be empty"));
        }
        if self.blob.list_limit == 0 {
            return Err(anyhow!("storage.blob.list_limit must be >= 1"));
        }
        if self.blob.key.trim().is_empty() {
            return Err(anyhow!("storage.blob.key must not be empty"));
        }
        Ok(())
    }

    pub fn relational_configured(&self) -> bool { !is_blank(&self.database_url) }

    pub fn object_configured(&self) -> bool { !is_blank(&self.blob.token) }
}

fn is_blank(v: &Option<String>) -> bool {
    v.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
