// API error responses - maps the service error taxonomy onto HTTP statuses
use crate::application::error::ServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub const NOT_FOUND_MESSAGE: &str = "接口不存在";
pub const INVALID_BODY_MESSAGE: &str = "请求参数无效";

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A service failure plus the localized message the handler reports it under
#[derive(Debug)]
pub struct ApiError {
    context: &'static str,
    source: ServiceError,
    verbose: bool,
}

impl ApiError {
    pub fn new(context: &'static str, source: ServiceError, verbose: bool) -> Self {
        Self {
            context,
            source,
            verbose,
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.source {
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::UpstreamUnavailable(e) if e.is_unavailable() => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServiceError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self, status: StatusCode) -> ErrorBody {
        let message = match &self.source {
            ServiceError::InvalidRequest(e) => Some(e.to_string()),
            ServiceError::NotFound(m) => Some(m.clone()),
            other if self.verbose => Some(other.to_string()),
            _ => None,
        };
        if status.is_server_error() {
            tracing::error!(context = self.context, error = %self.source, status = %status, "Request failed");
        } else {
            tracing::debug!(context = self.context, error = %self.source, status = %status, "Request rejected");
        }
        ErrorBody {
            error: self.context.to_string(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body(status);
        (status, Json(body)).into_response()
    }
}

/// Shorthand for `(status, {error, message})`
pub fn error_response(status: StatusCode, error: &str, message: Option<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::CapabilityError;
    use crate::domain::validation::ValidationError;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ServiceError::from(ValidationError::new("brands", "required")),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                CapabilityError::NotConfigured { capability: "model" }.into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CapabilityError::Timeout {
                    capability: "model",
                    timeout: Duration::from_secs(1),
                }
                .into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CapabilityError::malformed("model", "short").into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                anyhow::anyhow!("disk on fire").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (source, expected) in cases {
            assert_eq!(ApiError::new("失败", source, false).status(), expected);
        }
    }

    #[test]
    fn test_internal_detail_hidden_unless_verbose() {
        let quiet = ApiError::new("选址分析失败", anyhow::anyhow!("secret").into(), false);
        assert_eq!(quiet.body(StatusCode::INTERNAL_SERVER_ERROR).message, None);

        let verbose = ApiError::new("选址分析失败", anyhow::anyhow!("secret").into(), true);
        let body = verbose.body(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "选址分析失败");
        assert_eq!(body.message.as_deref(), Some("secret"));
    }

    #[test]
    fn test_validation_detail_always_shown() {
        let err = ApiError::new(
            "店铺模拟失败",
            ValidationError::new("brand.priceLevel", "must be within 1..=5").into(),
            false,
        );
        let body = err.body(StatusCode::BAD_REQUEST);
        assert!(body.message.unwrap().contains("brand.priceLevel"));
    }
}
