use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::models::{CategoryDto, CategoryRequest};
use crate::state::AppState;

const NOT_FOUND: &str = "Category not found";

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryDto>>> {
    let categories = state.categories.list().await?;
    Ok(Json(categories.iter().map(|c| c.to_dto()).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CategoryDto>> {
    state
        .categories
        .get(id)
        .await?
        .map(|c| Json(c.to_dto()))
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    req.validate().map_err(AppError::InvalidInput)?;
    let category = state.categories.create(&req).await?;
    Ok((StatusCode::CREATED, Json(category.to_dto())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<CategoryRequest>,
) -> AppResult<Json<CategoryDto>> {
    req.validate().map_err(AppError::InvalidInput)?;
    state
        .categories
        .update(id, &req)
        .await?
        .map(|c| Json(c.to_dto()))
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    if !state.categories.delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
