#![cfg(test)]
//! Test fixtures: throwaway SQLite databases and an in-process HTTP blob store.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use configs::BlobConfig;
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const MOCK_TOKEN: &str = "test-token";

/// A fresh file-backed SQLite database URL.
pub fn sqlite_url() -> String {
    let path = std::env::temp_dir().join(format!("svc_users_{}.sqlite", Uuid::new_v4()));
    format!("sqlite://{}?mode=rwc", path.display())
}

/// Blob config pointing at the mock with a valid token.
pub fn blob_config(mock: &MockBlobServer) -> BlobConfig {
    BlobConfig { token: Some(MOCK_TOKEN.into()), api_url: mock.base_url.clone(), ..BlobConfig::default() }
}

/// How the mock answers listing requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ListMode {
    Normal = 0,
    Forbidden = 1,
    Garbage = 2,
}

#[derive(Clone, Debug)]
pub struct RecordedPut {
    pub key: String,
    pub content_type: Option<String>,
    pub access: Option<String>,
    pub random_suffix: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    base_url: String,
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
    puts: RwLock<Vec<RecordedPut>>,
    list_calls: AtomicUsize,
    put_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    fail_fetches: AtomicBool,
    list_mode: AtomicU8,
}

/// Emulates a blob store API: `GET /?prefix&limit` lists, `PUT /:key`
/// uploads, `GET /content/:key` serves public content. Counts every request.
pub struct MockBlobServer {
    pub base_url: String,
    state: Arc<MockState>,
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    prefix: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize { 1000 }

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Bearer {MOCK_TOKEN}"))
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

async fn list(State(s): State<Arc<MockState>>, headers: HeaderMap, Query(q): Query<ListQuery>) -> Response {
    s.list_calls.fetch_add(1, Ordering::SeqCst);
    let mode = s.list_mode.load(Ordering::SeqCst);
    if mode == ListMode::Forbidden as u8 || !authorized(&headers) {
        return (StatusCode::FORBIDDEN, Json(serde_json::json!({"error": "forbidden"}))).into_response();
    }
    if mode == ListMode::Garbage as u8 {
        return (StatusCode::OK, "<html>not a listing</html>").into_response();
    }
    let objects = s.objects.read().await;
    let blobs: Vec<_> = objects
        .keys()
        .filter(|k| k.starts_with(&q.prefix))
        .take(q.limit)
        .map(|k| serde_json::json!({"pathname": k, "url": format!("{}/content/{}", s.base_url, k)}))
        .collect();
    (StatusCode::OK, Json(serde_json::json!({"blobs": blobs}))).into_response()
}

async fn upload(State(s): State<Arc<MockState>>, Path(key): Path<String>, headers: HeaderMap, body: Bytes) -> StatusCode {
    s.put_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN;
    }
    s.puts.write().await.push(RecordedPut {
        key: key.clone(),
        content_type: header(&headers, "x-content-type"),
        access: header(&headers, "x-access"),
        random_suffix: header(&headers, "x-add-random-suffix"),
        body: body.to_vec(),
    });
    s.objects.write().await.insert(key, body.to_vec());
    StatusCode::OK
}

async fn content(State(s): State<Arc<MockState>>, Path(key): Path<String>) -> Result<Vec<u8>, StatusCode> {
    s.fetch_calls.fetch_add(1, Ordering::SeqCst);
    if s.fail_fetches.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    s.objects.read().await.get(&key).cloned().ok_or(StatusCode::NOT_FOUND)
}

impl MockBlobServer {
    pub async fn start() -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}:{}", addr.ip(), addr.port());
        let state = Arc::new(MockState { base_url: base_url.clone(), ..MockState::default() });

        let app = Router::new()
            .route("/", get(list))
            .route("/:key", put(upload))
            .route("/content/:key", get(content))
            .with_state(Arc::clone(&state));
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await { eprintln!("mock blob server error: {}", e); }
        });

        Ok(Self { base_url, state })
    }

    pub async fn insert(&self, key: &str, body: Vec<u8>) {
        self.state.objects.write().await.insert(key.to_string(), body);
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.state.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn set_list_mode(&self, mode: ListMode) {
        self.state.list_mode.store(mode as u8, Ordering::SeqCst);
    }

    pub async fn last_put(&self) -> Option<RecordedPut> {
        self.state.puts.read().await.last().cloned()
    }

    pub fn list_calls(&self) -> usize { self.state.list_calls.load(Ordering::SeqCst) }

    pub fn put_calls(&self) -> usize { self.state.put_calls.load(Ordering::SeqCst) }

    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.put_calls() + self.state.fetch_calls.load(Ordering::SeqCst)
    }
}
