// Leasing service - Use cases for location analysis and virtual store simulation
use crate::application::catalog::DashboardCatalog;
use crate::application::error::ServiceResult;
use crate::application::location_optimizer::LocationOptimizer;
use crate::application::store_simulator::StoreSimulator;
use crate::domain::leasing::{
    AnalyzeCombinationsRequest, AnalyzeLocationRequest, BrandMixSimulation, LocationAnalysis,
    RankedCombination, RiskAnalysis, ScenarioAnalysisRequest, ScenarioOutcome,
    SimulateStoreRequest, SimulationResult, VirtualStoreSnapshot,
};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct LeasingService {
    catalog: Arc<dyn DashboardCatalog>,
    optimizer: LocationOptimizer,
    simulator: StoreSimulator,
}

impl LeasingService {
    pub fn new(
        catalog: Arc<dyn DashboardCatalog>,
        optimizer: LocationOptimizer,
        simulator: StoreSimulator,
    ) -> Self {
        Self {
            catalog,
            optimizer,
            simulator,
        }
    }

    pub async fn location_analysis(&self) -> ServiceResult<LocationAnalysis> {
        Ok(self.catalog.location_analysis().await?)
    }

    pub async fn brand_simulation(&self) -> ServiceResult<BrandMixSimulation> {
        Ok(self.catalog.brand_mix().await?)
    }

    pub async fn virtual_store(&self) -> ServiceResult<VirtualStoreSnapshot> {
        Ok(self.catalog.virtual_store().await?)
    }

    pub async fn analyze_location(&self, request: &AnalyzeLocationRequest) -> ServiceResult<RiskAnalysis> {
        Ok(self
            .optimizer
            .analyze_brand_combination(&request.brands, &request.location)
            .await?)
    }

    pub async fn analyze_combinations(
        &self,
        request: &AnalyzeCombinationsRequest,
    ) -> ServiceResult<Vec<RankedCombination>> {
        Ok(self
            .optimizer
            .analyze_combinations(&request.brand_combinations, &request.location)
            .await?)
    }

    pub async fn simulate_store(&self, request: &SimulateStoreRequest) -> ServiceResult<SimulationResult> {
        let today = Utc::now().date_naive();
        Ok(self
            .simulator
            .simulate_store(&request.brand, &request.location, &request.config, today)
            .await?)
    }

    pub async fn scenario_analysis(
        &self,
        request: &ScenarioAnalysisRequest,
    ) -> ServiceResult<Vec<ScenarioOutcome>> {
        let today = Utc::now().date_naive();
        Ok(self
            .simulator
            .scenario_analysis(&request.brand, &request.location, &request.scenarios, today)
            .await?)
    }
}
