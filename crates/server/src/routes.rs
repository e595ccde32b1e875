use axum::{
    http::StatusCode,
    extract::State,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::{error, Level};

use common::types::Health;

use crate::state::AppState;

pub mod api_users;
pub mod users;

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health { status: "ok", storage: state.store.kind().to_string() })
}

pub async fn metrics() -> (StatusCode, String) {
    match service::metrics::encode_metrics() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => {
            error!(error = %e, "metrics encode failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"))
        }
    }
}

/// Build the full application router: health/metrics, the in-memory JSON API
/// and the persistent form flow.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    // Ephemeral JSON API, never persisted
    let api = Router::new()
        .route("/api/users", get(api_users::list).post(api_users::create))
        .route(
            "/api/users/:id",
            get(api_users::get_one).put(api_users::replace).delete(api_users::delete),
        );

    // Form submissions persisted through the user store
    let forms = Router::new().route("/users", get(users::list).post(users::submit));

    public
        .merge(api)
        .merge(forms)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
