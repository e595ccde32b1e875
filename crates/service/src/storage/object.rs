use async_trait::async_trait;
use configs::BlobConfig;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{codec, BackendKind, StorageError, UserBackend};
use crate::User;

/// Users persisted as one JSON object in an HTTP blob store.
///
/// Reads list objects under `prefix`, take the entry whose pathname equals
/// `key` (or the first listed one) and download it from its public URL.
/// Writes `PUT` the whole payload to `key` with overwrite allowed; there is no
/// conditional write, so concurrent writers silently replace each other.
#[derive(Clone, Debug)]
pub struct ObjectBackend {
    client: Client,
    api_url: String,
    token: Option<String>,
    prefix: String,
    key: String,
    list_limit: u32,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    blobs: Vec<BlobEntry>,
}

#[derive(Debug, Deserialize)]
struct BlobEntry {
    pathname: String,
    url: String,
}

impl ObjectBackend {
    pub fn new(cfg: &BlobConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            token: cfg.token.clone().filter(|t| !t.trim().is_empty()),
            prefix: cfg.prefix.clone(),
            key: cfg.key.clone(),
            list_limit: cfg.list_limit,
        }
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Find the stored object. Any failure to list (transport, auth status,
    /// malformed body) counts as "nothing stored".
    async fn locate(&self) -> Option<BlobEntry> {
        let limit = self.list_limit.to_string();
        let req = self
            .client
            .get(&self.api_url)
            .query(&[("prefix", self.prefix.as_str()), ("limit", limit.as_str())]);
        let resp = match self.authorize(req).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "object listing failed; using empty collection");
                return None;
            }
        };
        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "object listing returned non-success; using empty collection");
            return None;
        }
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "object listing body read failed; using empty collection");
                return None;
            }
        };
        let mut blobs = match serde_json::from_slice::<ListResponse>(&bytes) {
            Ok(listing) => listing.blobs,
            Err(e) => {
                warn!(error = %e, "object listing is malformed; using empty collection");
                return None;
            }
        };
        if blobs.is_empty() {
            return None;
        }
        let idx = blobs.iter().position(|b| b.pathname == self.key).unwrap_or(0);
        Some(blobs.swap_remove(idx))
    }

    async fn fetch(&self, entry: &BlobEntry) -> Vec<User> {
        let resp = match self.client.get(&entry.url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(pathname = %entry.pathname, error = %e, "object fetch failed; using empty collection");
                return Vec::new();
            }
        };
        if !resp.status().is_success() {
            warn!(pathname = %entry.pathname, status = resp.status().as_u16(), "object fetch returned non-success; using empty collection");
            return Vec::new();
        }
        match resp.bytes().await {
            Ok(bytes) => codec::decode_users(&bytes),
            Err(e) => {
                warn!(pathname = %entry.pathname, error = %e, "object body read failed; using empty collection");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl UserBackend for ObjectBackend {
    fn kind(&self) -> BackendKind { BackendKind::Object }

    async fn read_all(&self) -> Result<Vec<User>, StorageError> {
        match self.locate().await {
            Some(entry) => {
                debug!(pathname = %entry.pathname, "object located");
                Ok(self.fetch(&entry).await)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, users: &[User]) -> Result<(), StorageError> {
        let body = codec::encode_users(users)?;
        let req = self
            .client
            .put(format!("{}/{}", self.api_url, self.key))
            .header("x-content-type", "application/json")
            .header("x-access", "public")
            .header("x-add-random-suffix", "0")
            .header("x-allow-overwrite", "1")
            .body(body);
        let resp = self.authorize(req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Status { status: status.as_u16(), body });
        }
        debug!(key = %self.key, count = users.len(), "object written");
        Ok(())
    }
}
