// Repository trait for the dashboard's reference data
use crate::domain::asset::AssetEvaluation;
use crate::domain::consumer::{ConsumerRecommendations, GuidePathOverview, StatusAnalysis};
use crate::domain::guide::GuideScript;
use crate::domain::leasing::{BrandMixSimulation, LocationAnalysis, VirtualStoreSnapshot};
use crate::domain::merchant::{
    CollaborationStats, InventoryItem, MerchantSummary, SalesSnapshot, SupplyChainStats,
};
use crate::domain::operations::{EmergencyOverview, EnergyData, EnergyOverview, MorningBriefing};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait DashboardCatalog: Send + Sync {
    async fn location_analysis(&self) -> anyhow::Result<LocationAnalysis>;

    async fn brand_mix(&self) -> anyhow::Result<BrandMixSimulation>;

    async fn virtual_store(&self) -> anyhow::Result<VirtualStoreSnapshot>;

    async fn morning_briefing(&self) -> anyhow::Result<MorningBriefing>;

    async fn energy_overview(&self) -> anyhow::Result<EnergyOverview>;

    async fn emergency_overview(&self) -> anyhow::Result<EmergencyOverview>;

    /// Readings recorded for a building at or after `since`, oldest first
    async fn energy_readings(
        &self,
        building_id: &str,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<EnergyData>>;

    async fn product_recommendations(&self) -> anyhow::Result<ConsumerRecommendations>;

    async fn guide_path(&self) -> anyhow::Result<GuidePathOverview>;

    async fn status_analysis(&self) -> anyhow::Result<StatusAnalysis>;

    async fn guide_script(&self, script_id: &str) -> anyhow::Result<Option<GuideScript>>;

    async fn merchants(&self) -> anyhow::Result<Vec<MerchantSummary>>;

    async fn sales(&self) -> anyhow::Result<SalesSnapshot>;

    /// Every tracked item, including those with healthy stock
    async fn inventory(&self) -> anyhow::Result<Vec<InventoryItem>>;

    async fn collaboration(&self) -> anyhow::Result<CollaborationStats>;

    async fn supply_chain(&self) -> anyhow::Result<SupplyChainStats>;

    async fn asset_evaluation(&self) -> anyhow::Result<AssetEvaluation>;
}
