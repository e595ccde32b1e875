use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use tower_http::cors::CorsLayer;
use tracing::info;

use service::{runtime, storage::UserStore};

use crate::{routes, state::AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Build the router for a ready store.
pub fn build_app(store: UserStore) -> Router {
    routes::build_router(AppState::new(store), build_cors())
}

/// Public entry: select the storage backend, build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let kind = runtime::ensure_env(&cfg.storage).await?;
    let store = UserStore::from_config(&cfg.storage).await?;
    let app = build_app(store);

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, backend = %kind, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
