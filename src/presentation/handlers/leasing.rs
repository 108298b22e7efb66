// Leasing handlers - location analysis, brand combinations and store simulation
use super::fail;
use crate::domain::leasing::{
    AnalyzeCombinationsRequest, AnalyzeLocationRequest, BrandMixSimulation, LocationAnalysis,
    RankedCombination, RiskAnalysis, ScenarioAnalysisRequest, ScenarioOutcome,
    SimulateStoreRequest, SimulationResult, VirtualStoreSnapshot,
};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::extract::ValidatedJson;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

pub async fn location_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LocationAnalysis>, ApiError> {
    state
        .leasing_service
        .location_analysis()
        .await
        .map(Json)
        .map_err(fail(&state, "获取选址分析失败"))
}

pub async fn brand_simulation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BrandMixSimulation>, ApiError> {
    state
        .leasing_service
        .brand_simulation()
        .await
        .map(Json)
        .map_err(fail(&state, "获取品牌组合模拟失败"))
}

pub async fn virtual_store(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VirtualStoreSnapshot>, ApiError> {
    state
        .leasing_service
        .virtual_store()
        .await
        .map(Json)
        .map_err(fail(&state, "获取虚拟店铺数据失败"))
}

pub async fn analyze_location(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AnalyzeLocationRequest>,
) -> Result<Json<RiskAnalysis>, ApiError> {
    state
        .leasing_service
        .analyze_location(&request)
        .await
        .map(Json)
        .map_err(fail(&state, "选址分析失败"))
}

pub async fn analyze_combinations(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AnalyzeCombinationsRequest>,
) -> Result<Json<Vec<RankedCombination>>, ApiError> {
    state
        .leasing_service
        .analyze_combinations(&request)
        .await
        .map(Json)
        .map_err(fail(&state, "品牌组合分析失败"))
}

pub async fn simulate_store(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SimulateStoreRequest>,
) -> Result<Json<SimulationResult>, ApiError> {
    state
        .leasing_service
        .simulate_store(&request)
        .await
        .map(Json)
        .map_err(fail(&state, "店铺模拟失败"))
}

pub async fn scenario_analysis(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ScenarioAnalysisRequest>,
) -> Result<Json<Vec<ScenarioOutcome>>, ApiError> {
    state
        .leasing_service
        .scenario_analysis(&request)
        .await
        .map(Json)
        .map_err(fail(&state, "情景分析失败"))
}
