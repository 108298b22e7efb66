// Leasing domain models - brands, locations, risk analysis and store simulation
use super::validation::{
    ensure_len, ensure_non_negative, ensure_not_blank, ensure_range, Validate, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Brand categories known to the feature encoders, in encoding order.
/// Anything else is encoded as the trailing "其他" slot.
pub const BRAND_CATEGORIES: [&str; 10] = [
    "餐饮", "服装", "数码", "美妆", "娱乐", "生活服务", "运动", "儿童", "家居", "其他",
];

pub const MAX_BRANDS_PER_COMBINATION: usize = 20;
pub const MAX_COMBINATIONS: usize = 20;
pub const MAX_SCENARIOS: usize = 10;
pub const MAX_SIMULATION_DAYS: u32 = 3650;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInfo {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Share of the brand's market, 0..=1
    pub market_share: f64,
    pub target_customer_base: Vec<String>,
    /// 1 (budget) ..= 5 (luxury)
    pub price_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rent: Option<f64>,
}

impl BrandInfo {
    /// One-hot encoding over `BRAND_CATEGORIES`
    pub fn category_one_hot(&self) -> [f64; 10] {
        let idx = BRAND_CATEGORIES
            .iter()
            .position(|c| *c == self.category.trim())
            .unwrap_or(BRAND_CATEGORIES.len() - 1);
        let mut encoded = [0.0; 10];
        encoded[idx] = 1.0;
        encoded
    }
}

impl Validate for BrandInfo {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("id", &self.id)?;
        ensure_not_blank("name", &self.name)?;
        ensure_not_blank("category", &self.category)?;
        ensure_range("marketShare", self.market_share, 0.0, 1.0)?;
        ensure_range("priceLevel", self.price_level, 1.0, 5.0)?;
        if let Some(revenue) = self.annual_revenue {
            ensure_non_negative("annualRevenue", revenue)?;
        }
        if let Some(rent) = self.average_rent {
            ensure_non_negative("averageRent", rent)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub population: f64,
    #[serde(default)]
    pub age_distribution: BTreeMap<String, f64>,
    /// Index on a 0..=10 scale
    pub income_level: f64,
    /// Index on a 0..=10 scale
    pub consumption_power: f64,
}

/// Access scores, each on a 0..=10 scale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfrastructure {
    pub parking: f64,
    pub public_transport: f64,
    pub walkability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub id: String,
    pub coordinates: Coordinates,
    /// Passers-by per day
    pub traffic_flow: f64,
    #[serde(default)]
    pub nearby_competitors: Vec<BrandInfo>,
    pub demographics: Demographics,
    pub infrastructure: SiteInfrastructure,
}

impl Validate for LocationData {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("id", &self.id)?;
        ensure_range("coordinates.latitude", self.coordinates.latitude, -90.0, 90.0)?;
        ensure_range("coordinates.longitude", self.coordinates.longitude, -180.0, 180.0)?;
        ensure_non_negative("trafficFlow", self.traffic_flow)?;
        ensure_non_negative("demographics.population", self.demographics.population)?;
        ensure_range("demographics.incomeLevel", self.demographics.income_level, 0.0, 10.0)?;
        ensure_range(
            "demographics.consumptionPower",
            self.demographics.consumption_power,
            0.0,
            10.0,
        )?;
        for (bracket, share) in &self.demographics.age_distribution {
            ensure_range(&format!("demographics.ageDistribution.{}", bracket), *share, 0.0, 1.0)?;
        }
        ensure_range("infrastructure.parking", self.infrastructure.parking, 0.0, 10.0)?;
        ensure_range(
            "infrastructure.publicTransport",
            self.infrastructure.public_transport,
            0.0,
            10.0,
        )?;
        ensure_range("infrastructure.walkability", self.infrastructure.walkability, 0.0, 10.0)?;
        self.nearby_competitors
            .validate()
            .map_err(|e| e.within("nearbyCompetitors"))
    }
}

// ---- Location analysis listing ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredFactor {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandCompatibility {
    pub brand: String,
    pub compatibility: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationAnalysis {
    /// 0..=100, the rounded mean of the factor scores
    pub score: f64,
    pub factors: Vec<ScoredFactor>,
    #[serde(default)]
    pub recommendations: Vec<BrandCompatibility>,
}

impl LocationAnalysis {
    pub fn new(factors: Vec<ScoredFactor>, recommendations: Vec<BrandCompatibility>) -> Self {
        let score = if factors.is_empty() {
            0.0
        } else {
            let mean = factors.iter().map(|f| f.score).sum::<f64>() / factors.len() as f64;
            mean.round().clamp(0.0, 100.0)
        };
        Self {
            score,
            factors,
            recommendations,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandMixSimulation {
    pub optimal_mix: Vec<CategoryShare>,
    pub expected_revenue: f64,
    pub risk_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualStoreSnapshot {
    pub layout_efficiency: f64,
    pub predicted_sales: f64,
    pub customer_flow: f64,
    pub peak_hours: Vec<String>,
    pub suggestions: Vec<String>,
}

// ---- Risk analysis ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub score: f64,
    pub confidence: f64,
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionIndex {
    pub matrix: Vec<Vec<f64>>,
    pub overall_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFlowPrediction {
    pub daily: f64,
    pub weekly: Vec<f64>,
    pub seasonal: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    pub risk_score: RiskScore,
    pub competition_index: CompetitionIndex,
    pub customer_flow_prediction: CustomerFlowPrediction,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeLocationRequest {
    pub brands: Vec<BrandInfo>,
    pub location: LocationData,
}

impl Validate for AnalyzeLocationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_len("brands", self.brands.len(), 1, MAX_BRANDS_PER_COMBINATION)?;
        self.brands.validate().map_err(|e| e.within("brands"))?;
        self.location.validate().map_err(|e| e.within("location"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCombinationsRequest {
    pub brand_combinations: Vec<Vec<BrandInfo>>,
    pub location: LocationData,
}

impl Validate for AnalyzeCombinationsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_len(
            "brandCombinations",
            self.brand_combinations.len(),
            1,
            MAX_COMBINATIONS,
        )?;
        for (idx, combination) in self.brand_combinations.iter().enumerate() {
            let prefix = format!("brandCombinations[{}]", idx);
            ensure_len(&prefix, combination.len(), 1, MAX_BRANDS_PER_COMBINATION)?;
            combination.validate().map_err(|e| e.within(&prefix))?;
        }
        self.location.validate().map_err(|e| e.within("location"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCombination {
    pub combination: Vec<BrandInfo>,
    pub analysis: RiskAnalysis,
    pub score: f64,
}

// ---- Virtual store simulation ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialEvent {
    pub name: String,
    pub date: NaiveDate,
    /// Added to the seasonality factor on the event day
    pub impact: f64,
}

/// Fully resolved simulation settings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub start_date: NaiveDate,
    pub duration: u32,
    pub customer_volume: f64,
    pub seasonality: Vec<f64>,
    pub special_events: Vec<SpecialEvent>,
}

/// Client-supplied partial simulation settings; unset fields fall back to defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_events: Option<Vec<SpecialEvent>>,
}

impl Validate for SimulationOverrides {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(duration) = self.duration {
            ensure_range("duration", duration as f64, 1.0, MAX_SIMULATION_DAYS as f64)?;
        }
        if let Some(volume) = self.customer_volume {
            ensure_non_negative("customerVolume", volume)?;
        }
        if let Some(seasonality) = &self.seasonality {
            ensure_len("seasonality", seasonality.len(), 12, 12)?;
            for (idx, factor) in seasonality.iter().enumerate() {
                ensure_non_negative(&format!("seasonality[{}]", idx), *factor)?;
            }
        }
        if let Some(events) = &self.special_events {
            for (idx, event) in events.iter().enumerate() {
                ensure_not_blank(&format!("specialEvents[{}].name", idx), &event.name)?;
                ensure_range(&format!("specialEvents[{}].impact", idx), event.impact, -1.0, 10.0)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalCosts {
    pub rent: f64,
    pub labor: f64,
    pub utilities: f64,
    pub marketing: f64,
}

impl OperationalCosts {
    pub fn total(&self) -> f64 {
        self.rent + self.labor + self.utilities + self.marketing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreKpis {
    pub roi: f64,
    /// Days until cumulative profit covers costs; absent when the store never turns a profit
    pub payback_period: Option<f64>,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub daily_revenue: Vec<f64>,
    pub customer_flow: Vec<f64>,
    pub conversion_rate: f64,
    pub average_ticket_size: f64,
    /// Expected visitors per hour of day, 24 entries
    pub peak_hours: Vec<f64>,
    pub operational_costs: OperationalCosts,
    pub kpis: StoreKpis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateStoreRequest {
    pub brand: BrandInfo,
    pub location: LocationData,
    #[serde(default)]
    pub config: SimulationOverrides,
}

impl Validate for SimulateStoreRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.brand.validate().map_err(|e| e.within("brand"))?;
        self.location.validate().map_err(|e| e.within("location"))?;
        self.config.validate().map_err(|e| e.within("config"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAnalysisRequest {
    pub brand: BrandInfo,
    pub location: LocationData,
    pub scenarios: Vec<SimulationOverrides>,
}

impl Validate for ScenarioAnalysisRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.brand.validate().map_err(|e| e.within("brand"))?;
        self.location.validate().map_err(|e| e.within("location"))?;
        ensure_len("scenarios", self.scenarios.len(), 1, MAX_SCENARIOS)?;
        self.scenarios.validate().map_err(|e| e.within("scenarios"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub scenario: SimulationOverrides,
    pub simulation: SimulationResult,
    pub impact: f64,
}
