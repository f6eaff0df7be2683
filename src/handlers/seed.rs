use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::services::SeedReport;
use crate::state::AppState;

#[derive(Serialize)]
pub struct LoadDataResponse {
    pub message: &'static str,
    pub inserted: SeedReport,
}

pub async fn load_data(State(state): State<AppState>) -> AppResult<Json<LoadDataResponse>> {
    let inserted = state.seeder.load_file(&state.config.seed_file).await?;
    Ok(Json(LoadDataResponse {
        message: "Data loaded successfully!",
        inserted,
    }))
}
