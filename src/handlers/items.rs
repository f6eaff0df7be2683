use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::models::{ItemDto, ItemRequest};
use crate::state::AppState;

const NOT_FOUND: &str = "Item not found";

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ItemDto>>> {
    let items = state.items.list().await?;
    Ok(Json(items.iter().map(|i| i.to_dto()).collect()))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<ItemDto>> {
    state
        .items
        .get(id)
        .await?
        .map(|i| Json(i.to_dto()))
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ItemRequest>,
) -> AppResult<(StatusCode, Json<ItemDto>)> {
    req.validate().map_err(AppError::InvalidInput)?;
    let item = state.items.create(&req).await?;
    Ok((StatusCode::CREATED, Json(item.to_dto())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<ItemRequest>,
) -> AppResult<Json<ItemDto>> {
    req.validate().map_err(AppError::InvalidInput)?;
    state
        .items
        .update(id, &req)
        .await?
        .map(|i| Json(i.to_dto()))
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    if !state.items.delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
