use serde::Serialize;

/// Liveness payload returned by `/health`, including the active storage backend.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub storage: String,
}

/// Generic error body returned by the HTTP layer.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}
