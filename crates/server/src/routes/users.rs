use axum::{
    extract::State,
    response::Redirect,
    Form, Json,
};

use models::user::NewUser;
use service::{user_service, User};

use crate::{errors::ApiError, state::AppState};

/// Everything currently persisted in the user store.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = user_service::list_users(&state.store).await?;
    Ok(Json(users))
}

/// Form submission: append one user to the store, then redirect to the list.
pub async fn submit(State(state): State<AppState>, Form(input): Form<NewUser>) -> Result<Redirect, ApiError> {
    user_service::register_user(&state.store, input).await?;
    Ok(Redirect::to("/users"))
}
