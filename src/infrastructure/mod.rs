// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod logging;
pub mod openai_client;
pub mod perspective_renderer;
pub mod remote_predictor;
pub mod static_catalog;
pub mod unconfigured;
