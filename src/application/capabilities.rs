// Capability traits - opaque providers the services reach models through
use crate::application::error::CapabilityError;
use crate::domain::guide::{RenderedFrame, SceneGraph};
use async_trait::async_trait;

/// Model runtime: feature vector in, output vector out
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, features: &[f64]) -> Result<Vec<f64>, CapabilityError>;
}

/// Chat-style text completion
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CapabilityError>;
}

/// Turns a scene graph into one frame of screen-space markers
#[async_trait]
pub trait SceneRenderer: Send + Sync {
    async fn render(&self, scene: &SceneGraph, index: u64) -> Result<RenderedFrame, CapabilityError>;
}
