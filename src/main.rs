// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::ar_guide_service::ArGuideService;
use crate::application::asset_service::AssetService;
use crate::application::capabilities::{Predictor, TextGenerator};
use crate::application::catalog::DashboardCatalog;
use crate::application::consumer_service::ConsumerService;
use crate::application::energy_optimizer::EnergyOptimizer;
use crate::application::leasing_service::LeasingService;
use crate::application::location_optimizer::LocationOptimizer;
use crate::application::merchant_service::MerchantService;
use crate::application::operations_assistant::OperationsAssistant;
use crate::application::operations_service::OperationsService;
use crate::application::store_simulator::StoreSimulator;
use crate::infrastructure::config::{load_app_config, ModelSettings};
use crate::infrastructure::logging::setup_logging;
use crate::infrastructure::openai_client::OpenAiClient;
use crate::infrastructure::perspective_renderer::PerspectiveRenderer;
use crate::infrastructure::remote_predictor::RemotePredictor;
use crate::infrastructure::static_catalog::StaticCatalog;
use crate::infrastructure::unconfigured::Unconfigured;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

fn predictor_for(client: &reqwest::Client, settings: &ModelSettings, model: &str) -> Arc<dyn Predictor> {
    match settings.configured_endpoint() {
        Some(endpoint) => Arc::new(RemotePredictor::new(
            client.clone(),
            endpoint,
            model,
            settings.timeout(),
        )),
        None => Arc::new(Unconfigured::new("model runtime")),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    // Load configuration
    let config = load_app_config()?;
    let client = reqwest::Client::builder().build()?;

    // Capability providers (infrastructure layer)
    let catalog: Arc<dyn DashboardCatalog> = Arc::new(StaticCatalog::new());
    let location_model = predictor_for(&client, &config.model, &config.model.location_model);
    let store_model = predictor_for(&client, &config.model, &config.model.store_model);
    let energy_model = predictor_for(&client, &config.model, &config.model.energy_model);
    let text: Arc<dyn TextGenerator> = match OpenAiClient::from_settings(client.clone(), &config.llm) {
        Some(llm) => Arc::new(llm),
        None => {
            tracing::warn!("No LLM API key configured, report generation will answer 503");
            Arc::new(Unconfigured::new("text generator"))
        }
    };
    if config.model.configured_endpoint().is_none() {
        tracing::warn!("No model endpoint configured, prediction-backed operations will answer 503");
    }

    // Create services (application layer)
    let model_timeout = config.model.timeout();
    let leasing_service = LeasingService::new(
        catalog.clone(),
        LocationOptimizer::new(location_model, config.leasing.clone(), model_timeout),
        StoreSimulator::new(store_model, config.simulation.clone(), model_timeout),
    );
    let operations_service = OperationsService::new(
        catalog.clone(),
        OperationsAssistant::new(text, config.llm.timeout()),
        EnergyOptimizer::new(energy_model, config.energy.clone(), model_timeout),
    );
    let consumer_service = ConsumerService::new(
        catalog.clone(),
        ArGuideService::new(catalog.clone(), Arc::new(PerspectiveRenderer), config.ar.clone()),
    );

    // Create application state
    let state = Arc::new(AppState {
        leasing_service,
        operations_service,
        consumer_service,
        merchant_service: MerchantService::new(catalog.clone()),
        asset_service: AssetService::new(catalog),
        verbose_errors: !config.server.is_production(),
    });

    // Build router (presentation layer)
    let router = build_router(state, config.server.request_timeout());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!(%addr, environment = %config.server.environment, "Starting store-dashboard");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
