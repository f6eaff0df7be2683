use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::models::{ProductDto, ProductRequest};
use crate::state::AppState;

const NOT_FOUND: &str = "Product not found";

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ProductDto>>> {
    let products = state.products.list().await?;
    Ok(Json(products.iter().map(|p| p.to_dto()).collect()))
}

/// An unknown category yields an empty list.
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> AppResult<Json<Vec<ProductDto>>> {
    let products = state.products.list_by_category(category_id).await?;
    Ok(Json(products.iter().map(|p| p.to_dto()).collect()))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<ProductDto>> {
    state
        .products
        .get(id)
        .await?
        .map(|p| Json(p.to_dto()))
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> AppResult<(StatusCode, Json<ProductDto>)> {
    req.validate().map_err(AppError::InvalidInput)?;
    let product = state.products.create(&req).await?;
    tracing::debug!("Product created: id={}", product.id);
    Ok((StatusCode::CREATED, Json(product.to_dto())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<ProductRequest>,
) -> AppResult<Json<ProductDto>> {
    req.validate().map_err(AppError::InvalidInput)?;
    state
        .products
        .update(id, &req)
        .await?
        .map(|p| Json(p.to_dto()))
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    if !state.products.delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
