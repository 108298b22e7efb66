// HTTP request handlers, one module per dashboard section
pub mod asset;
pub mod consumer;
pub mod home;
pub mod leasing;
pub mod merchant;
pub mod operations;

use crate::application::error::ServiceError;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::Json;
use serde_json::{json, Value};

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Error mapper carrying the handler's localized context message
pub(crate) fn fail(state: &AppState, context: &'static str) -> impl FnOnce(ServiceError) -> ApiError {
    let verbose = state.verbose_errors;
    move |source| ApiError::new(context, source, verbose)
}
