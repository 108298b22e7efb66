// Consumer handlers - recommendations, guide path, AR sessions and crowd status
use super::fail;
use crate::domain::consumer::{ConsumerRecommendations, GuidePathOverview, StatusAnalysis};
use crate::domain::guide::StartGuideRequest;
use crate::infrastructure::http_response::stream_from_receiver;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::extract::ValidatedJson;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

pub async fn recommendations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConsumerRecommendations>, ApiError> {
    state
        .consumer_service
        .recommendations()
        .await
        .map(Json)
        .map_err(fail(&state, "获取推荐失败"))
}

pub async fn ar_guide(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GuidePathOverview>, ApiError> {
    state
        .consumer_service
        .guide_path()
        .await
        .map(Json)
        .map_err(fail(&state, "获取导购路线失败"))
}

/// Streams the session as newline-delimited JSON events
pub async fn start_guide_session(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<StartGuideRequest>,
) -> Result<Response, ApiError> {
    let rx = state
        .consumer_service
        .start_guide(&request)
        .await
        .map_err(fail(&state, "启动AR导购失败"))?;
    Ok(stream_from_receiver(rx).into_response())
}

pub async fn status_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusAnalysis>, ApiError> {
    state
        .consumer_service
        .status_analysis()
        .await
        .map(Json)
        .map_err(fail(&state, "获取状态分析失败"))
}
