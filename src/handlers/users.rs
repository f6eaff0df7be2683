use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::models::{normalize_email, UpdateUserRequest, UserDto};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserDto>>> {
    let users = state.users.list().await?;
    Ok(Json(users.iter().map(|u| u.to_dto()).collect()))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<UserDto>> {
    state
        .users
        .get(id)
        .await?
        .map(|u| Json(u.to_dto()))
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<UserDto>> {
    apply_update(&state, id, req).await
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    if !state.users.delete(id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    tracing::info!("User deleted: id={}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Shared by `PUT /users/:id` and `PUT /auth/update`.
pub(crate) async fn apply_update(
    state: &AppState,
    id: i32,
    mut req: UpdateUserRequest,
) -> AppResult<Json<UserDto>> {
    req.validate().map_err(AppError::InvalidInput)?;
    req.email = normalize_email(&req.email);
    state
        .users
        .update(id, &req)
        .await?
        .map(|u| Json(u.to_dto()))
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
