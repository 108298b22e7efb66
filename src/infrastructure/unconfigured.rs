// Stand-in capability for deployments without a backend
use crate::application::capabilities::{Predictor, TextGenerator};
use crate::application::error::CapabilityError;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy)]
pub struct Unconfigured {
    pub capability: &'static str,
}

impl Unconfigured {
    pub const fn new(capability: &'static str) -> Self {
        Self { capability }
    }

    fn error(&self) -> CapabilityError {
        CapabilityError::NotConfigured {
            capability: self.capability,
        }
    }
}

#[async_trait]
impl Predictor for Unconfigured {
    async fn predict(&self, _features: &[f64]) -> Result<Vec<f64>, CapabilityError> {
        Err(self.error())
    }
}

#[async_trait]
impl TextGenerator for Unconfigured {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, CapabilityError> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_not_configured() {
        let predictor = Unconfigured::new("model runtime");
        let err = predictor.predict(&[1.0]).await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(err.to_string(), "model runtime is not configured");
    }
}
