// Merchant handlers - merchant list, analysis, collaboration and supply chain
use super::fail;
use crate::domain::merchant::{
    CollaborationStats, MerchantAnalysis, MerchantSummary, SupplyChainStats,
};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

pub async fn list_merchants(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MerchantSummary>>, ApiError> {
    state
        .merchant_service
        .list_merchants()
        .await
        .map(Json)
        .map_err(fail(&state, "获取商户列表失败"))
}

pub async fn analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MerchantAnalysis>, ApiError> {
    state
        .merchant_service
        .analysis()
        .await
        .map(Json)
        .map_err(fail(&state, "获取商户分析失败"))
}

pub async fn collaboration(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CollaborationStats>, ApiError> {
    state
        .merchant_service
        .collaboration()
        .await
        .map(Json)
        .map_err(fail(&state, "获取协作数据失败"))
}

pub async fn supply_chain(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SupplyChainStats>, ApiError> {
    state
        .merchant_service
        .supply_chain()
        .await
        .map(Json)
        .map_err(fail(&state, "获取供应链数据失败"))
}
