// Operations handlers - briefings, emergencies and energy management
use super::fail;
use crate::application::error::ServiceError;
use crate::domain::operations::{
    ComfortAssessment, ComfortAssessmentRequest, EmergencyOverview, EmergencyResponse,
    EnergyData, EnergyOptimizationRequest, EnergyOverview, HandleEmergencyRequest,
    MorningBriefing, MorningReport, MorningReportRequest, OptimizationResult,
};
use crate::domain::validation::ValidationError;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::extract::ValidatedJson;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_TIME_RANGE: &str = "24h";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringQuery {
    pub building_id: Option<String>,
    pub time_range: Option<String>,
}

pub async fn morning_briefing(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MorningBriefing>, ApiError> {
    state
        .operations_service
        .morning_briefing()
        .await
        .map(Json)
        .map_err(fail(&state, "获取晨会简报失败"))
}

pub async fn morning_report(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<MorningReportRequest>,
) -> Result<Json<MorningReport>, ApiError> {
    state
        .operations_service
        .morning_report(&request)
        .await
        .map(Json)
        .map_err(fail(&state, "生成晨会简报失败"))
}

pub async fn handle_emergency(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<HandleEmergencyRequest>,
) -> Result<Json<EmergencyResponse>, ApiError> {
    state
        .operations_service
        .handle_emergency(&request)
        .await
        .map(Json)
        .map_err(fail(&state, "处理突发事件失败"))
}

pub async fn energy_optimization(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<EnergyOptimizationRequest>,
) -> Result<Json<OptimizationResult>, ApiError> {
    state
        .operations_service
        .optimize_energy(&request)
        .await
        .map(Json)
        .map_err(fail(&state, "能耗优化分析失败"))
}

pub async fn energy_monitoring(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonitoringQuery>,
) -> Result<Json<Vec<EnergyData>>, ApiError> {
    const CONTEXT: &str = "能耗监控数据获取失败";
    let building_id = query
        .building_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            fail(&state, CONTEXT)(ServiceError::from(ValidationError::new(
                "buildingId",
                "is required",
            )))
        })?;
    let time_range = query.time_range.as_deref().unwrap_or(DEFAULT_TIME_RANGE);

    state
        .operations_service
        .energy_monitoring(&building_id, time_range)
        .await
        .map(Json)
        .map_err(fail(&state, CONTEXT))
}

pub async fn comfort_assessment(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ComfortAssessmentRequest>,
) -> Json<ComfortAssessment> {
    Json(state.operations_service.comfort_assessment(&request))
}

pub async fn energy_overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EnergyOverview>, ApiError> {
    state
        .operations_service
        .energy_overview()
        .await
        .map(Json)
        .map_err(fail(&state, "获取能耗数据失败"))
}

pub async fn emergency_overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EmergencyOverview>, ApiError> {
    state
        .operations_service
        .emergency_overview()
        .await
        .map(Json)
        .map_err(fail(&state, "获取应急数据失败"))
}
