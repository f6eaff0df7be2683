use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::models::{DriverDto, DriverRequest};
use crate::state::AppState;

const NOT_FOUND: &str = "Driver not found";

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<DriverDto>>> {
    let drivers = state.drivers.list().await?;
    Ok(Json(drivers.iter().map(|d| d.to_dto()).collect()))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<DriverDto>> {
    state
        .drivers
        .get(id)
        .await?
        .map(|d| Json(d.to_dto()))
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<DriverRequest>,
) -> AppResult<(StatusCode, Json<DriverDto>)> {
    req.validate().map_err(AppError::InvalidInput)?;
    let driver = state.drivers.create(&req).await?;
    Ok((StatusCode::CREATED, Json(driver.to_dto())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<DriverRequest>,
) -> AppResult<Json<DriverDto>> {
    req.validate().map_err(AppError::InvalidInput)?;
    state
        .drivers
        .update(id, &req)
        .await?
        .map(|d| Json(d.to_dto()))
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    if !state.drivers.delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
