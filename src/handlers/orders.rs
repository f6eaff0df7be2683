use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::AuthenticatedUser;
use crate::models::{CreateOrderRequest, OrderDto};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<OrderDto>>> {
    state.orders.list().await.map(Json)
}

pub async fn list_for_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<OrderDto>>> {
    state.orders.list_for_user(user.user_id).await.map(Json)
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<OrderDto>> {
    state.orders.get(id).await.map(Json)
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderDto>)> {
    let order = state.orders.create(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
