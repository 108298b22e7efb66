// Asset handler - ESG and data asset evaluation
use super::fail;
use crate::domain::asset::AssetEvaluation;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

pub async fn evaluation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AssetEvaluation>, ApiError> {
    state
        .asset_service
        .evaluation()
        .await
        .map(Json)
        .map_err(fail(&state, "获取资产评估失败"))
}
