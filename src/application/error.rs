// Error taxonomy shared by every service
use crate::domain::validation::ValidationError;
use std::time::Duration;
use thiserror::Error;

/// Failures of an injected capability provider (model runtime, LLM, renderer)
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("{capability} is not configured")]
    NotConfigured { capability: &'static str },

    #[error("{capability} did not answer within {timeout:?}")]
    Timeout {
        capability: &'static str,
        timeout: Duration,
    },

    #[error("{capability} failed: {reason}")]
    Failed {
        capability: &'static str,
        reason: String,
    },

    #[error("{capability} returned malformed output: {reason}")]
    MalformedOutput {
        capability: &'static str,
        reason: String,
    },
}

impl CapabilityError {
    pub fn failed(capability: &'static str, reason: impl ToString) -> Self {
        Self::Failed {
            capability,
            reason: reason.to_string(),
        }
    }

    pub fn malformed(capability: &'static str, reason: impl ToString) -> Self {
        Self::MalformedOutput {
            capability,
            reason: reason.to_string(),
        }
    }

    /// The provider is absent or slow, as opposed to answering badly
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotConfigured { .. } | Self::Timeout { .. })
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    UpstreamUnavailable(#[from] CapabilityError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Bound a capability call by `timeout`
pub async fn with_timeout<T, F>(
    capability: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T, CapabilityError>
where
    F: std::future::Future<Output = Result<T, CapabilityError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| CapabilityError::Timeout {
            capability,
            timeout,
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_maps_elapsed() {
        let result: Result<(), _> = with_timeout("predictor", Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        })
        .await;
        let err = result.unwrap_err();
        assert!(matches!(err, CapabilityError::Timeout { .. }));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_validation_converts_to_invalid_request() {
        let err: ServiceError = ValidationError::new("brands", "must not be empty").into();
        assert_eq!(err.to_string(), "invalid request: brands: must not be empty");
    }
}
