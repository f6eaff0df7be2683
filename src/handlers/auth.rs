use axum::extract::State;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthenticatedUser;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, UserDto};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    state.auth.register(req).await.map(Json)
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    state.auth.login(req).await.map(Json)
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<UserDto>> {
    let found = state
        .users
        .get(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(found.to_dto()))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<UserDto>> {
    super::users::apply_update(&state, user.user_id, req).await
}
