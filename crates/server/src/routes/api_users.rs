use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use models::user::NewUser;
use service::{errors::ServiceError, User};

use crate::{errors::ApiError, state::AppState};

pub async fn list(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.memory.list().await)
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<User>, ApiError> {
    state.memory.get(id).await.map(Json).ok_or(ApiError::NotFound)
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    input.validate()?;
    let user = state
        .memory
        .create(input)
        .await
        .ok_or_else(|| ApiError::from(ServiceError::IdsExhausted))?;
    info!(user_id = user.id, "api user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Full replacement of name and email; partial bodies are rejected by the extractor.
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
    input.validate()?;
    state.memory.replace(id, input).await.map(Json).ok_or(ApiError::NotFound)
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> StatusCode {
    if state.memory.delete(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
