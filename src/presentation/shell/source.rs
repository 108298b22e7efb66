// Page data sources - where the shell fetches endpoint JSON from
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed with status {0}")]
    Status(StatusCode),
    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait PageSource: Send + Sync {
    /// GET `path` and return the raw response body
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetches by dispatching into the API router in-process
#[derive(Clone)]
pub struct RouterPageSource {
    api: Router,
}

impl RouterPageSource {
    pub fn new(api: Router) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource for RouterPageSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let request = Request::get(path)
            .body(Body::empty())
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let response = self
            .api
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}
