// Operations domain models - briefings, reports, emergencies and energy
use super::validation::{
    ensure_len, ensure_non_negative, ensure_not_blank, ensure_range, Validate, ValidationError,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const MAX_MONITORING_RANGE: Duration = Duration::from_secs(30 * 24 * 3600);

// ---- Morning briefing listing ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherOutlook {
    pub temperature: f64,
    pub condition: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorningBriefing {
    pub date: DateTime<Utc>,
    pub highlights: Vec<Highlight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherOutlook>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

// ---- Morning report (text generation) ----

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    pub total_traffic: f64,
    pub total_sales: f64,
    pub conversion_rate: f64,
    pub transactions: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalAverages {
    pub average_daily_sales: f64,
    pub average_daily_traffic: f64,
    pub average_conversion_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOutlook {
    pub expected_traffic: f64,
    pub weather: String,
    #[serde(default)]
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreData {
    pub yesterday_metrics: DailyMetrics,
    pub historical_data: HistoricalAverages,
    #[serde(default)]
    pub key_issues: Vec<String>,
    pub predictions: DayOutlook,
}

impl Validate for StoreData {
    fn validate(&self) -> Result<(), ValidationError> {
        let m = &self.yesterday_metrics;
        ensure_non_negative("yesterdayMetrics.totalTraffic", m.total_traffic)?;
        ensure_non_negative("yesterdayMetrics.totalSales", m.total_sales)?;
        ensure_range("yesterdayMetrics.conversionRate", m.conversion_rate, 0.0, 1.0)?;
        ensure_non_negative("yesterdayMetrics.transactions", m.transactions)?;
        let h = &self.historical_data;
        ensure_range(
            "historicalData.averageDailySales",
            h.average_daily_sales,
            f64::MIN_POSITIVE,
            f64::MAX,
        )?;
        ensure_range(
            "historicalData.averageDailyTraffic",
            h.average_daily_traffic,
            f64::MIN_POSITIVE,
            f64::MAX,
        )?;
        ensure_range(
            "historicalData.averageConversionRate",
            h.average_conversion_rate,
            0.0,
            1.0,
        )?;
        ensure_non_negative("predictions.expectedTraffic", self.predictions.expected_traffic)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorningReportRequest {
    pub date: NaiveDate,
    pub store_data: StoreData,
}

impl Validate for MorningReportRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.store_data.validate().map_err(|e| e.within("storeData"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportContent {
    pub summary: String,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    /// Percent change of yesterday's sales against the historical daily average
    pub sales_growth: f64,
    /// Percent change of yesterday's traffic against the historical daily average
    pub traffic_growth: f64,
    pub conversion_rate: f64,
    pub average_ticket_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorningReport {
    pub date: NaiveDate,
    pub content: ReportContent,
    pub metrics: ReportMetrics,
    pub recommendations: Vec<String>,
}

// ---- Emergencies ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    New,
    Processing,
    Handled,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub affected_areas: Vec<String>,
    pub severity: Severity,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleEmergencyRequest {
    pub event_type: String,
    pub event_data: EmergencyEvent,
}

impl Validate for HandleEmergencyRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("eventType", &self.event_type)?;
        let event = &self.event_data;
        ensure_not_blank("eventData.id", &event.id)?;
        ensure_not_blank("eventData.type", &event.kind)?;
        ensure_not_blank("eventData.description", &event.description)?;
        ensure_len("eventData.affectedAreas", event.affected_areas.len(), 1, 64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationPlan {
    pub priority: String,
    pub channels: Vec<String>,
    pub briefing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePlan {
    pub immediate_actions: Vec<String>,
    pub resource_allocation: BTreeMap<String, String>,
    pub communication_plan: CommunicationPlan,
    pub follow_up_tasks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyResponse {
    pub event_id: String,
    pub status: EventStatus,
    pub plan: ResponsePlan,
    pub automated_actions: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub level: Severity,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRoster {
    pub security: u32,
    pub medical: u32,
    pub maintenance: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyOverview {
    pub active_events: Vec<ActiveEvent>,
    pub resources: ResourceRoster,
    pub protocols: Vec<String>,
}

// ---- Energy ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HvacReading {
    pub temperature: f64,
    pub humidity: f64,
    /// kW
    pub power: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightingReading {
    pub power: f64,
    pub brightness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentReading {
    pub power: f64,
    pub utilization: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyReadings {
    pub hvac: HvacReading,
    pub lighting: LightingReading,
    pub equipment: EquipmentReading,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub occupancy: f64,
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyData {
    pub building_id: String,
    pub timestamp: DateTime<Utc>,
    pub readings: EnergyReadings,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl Validate for EnergyData {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("buildingId", &self.building_id)?;
        let r = &self.readings;
        ensure_range("readings.hvac.temperature", r.hvac.temperature, -40.0, 60.0)?;
        ensure_range("readings.hvac.humidity", r.hvac.humidity, 0.0, 100.0)?;
        ensure_non_negative("readings.hvac.power", r.hvac.power)?;
        ensure_non_negative("readings.lighting.power", r.lighting.power)?;
        ensure_non_negative("readings.lighting.brightness", r.lighting.brightness)?;
        ensure_non_negative("readings.equipment.power", r.equipment.power)?;
        ensure_range("readings.equipment.utilization", r.equipment.utilization, 0.0, 1.0)?;
        for (idx, zone) in self.zones.iter().enumerate() {
            ensure_not_blank(&format!("zones[{}].id", idx), &zone.id)?;
            ensure_non_negative(&format!("zones[{}].occupancy", idx), zone.occupancy)?;
            ensure_range(&format!("zones[{}].humidity", idx), zone.humidity, 0.0, 100.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingHours {
    /// "HH:MM"
    pub start: String,
    /// "HH:MM"
    pub end: String,
}

impl OperatingHours {
    fn parse_hour(value: &str) -> Option<u32> {
        let (hour, minute) = value.trim().split_once(':')?;
        let hour: u32 = hour.parse().ok()?;
        let minute: u32 = minute.parse().ok()?;
        (hour < 24 && minute < 60).then_some(hour)
    }

    pub fn start_hour(&self) -> Option<u32> {
        Self::parse_hour(&self.start)
    }

    pub fn end_hour(&self) -> Option<u32> {
        Self::parse_hour(&self.end)
    }

    /// Whether the tenant is open during `hour`. Both ends are inclusive and
    /// a window whose end precedes its start runs past midnight.
    pub fn contains_hour(&self, hour: u32) -> bool {
        match (self.start_hour(), self.end_hour()) {
            (Some(start), Some(end)) if start <= end => hour >= start && hour <= end,
            (Some(start), Some(end)) => hour >= start || hour <= end,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantPreference {
    pub id: String,
    pub name: String,
    pub zone: String,
    pub temperature_range: ValueRange,
    pub humidity_range: ValueRange,
    pub operating_hours: OperatingHours,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<Vec<String>>,
}

impl Validate for TenantPreference {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("id", &self.id)?;
        ensure_not_blank("zone", &self.zone)?;
        if self.temperature_range.min > self.temperature_range.max {
            return Err(ValidationError::new("temperatureRange", "min exceeds max"));
        }
        if self.humidity_range.min > self.humidity_range.max {
            return Err(ValidationError::new("humidityRange", "min exceeds max"));
        }
        if self.operating_hours.start_hour().is_none() {
            return Err(ValidationError::new("operatingHours.start", "expected HH:MM"));
        }
        if self.operating_hours.end_hour().is_none() {
            return Err(ValidationError::new("operatingHours.end", "expected HH:MM"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyOptimizationRequest {
    pub building_data: EnergyData,
    #[serde(default)]
    pub tenant_preferences: Vec<TenantPreference>,
}

impl Validate for EnergyOptimizationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.building_data
            .validate()
            .map_err(|e| e.within("buildingData"))?;
        self.tenant_preferences
            .validate()
            .map_err(|e| e.within("tenantPreferences"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    /// kWh per year
    pub expected_savings: f64,
    pub implementation_cost: f64,
    pub roi: f64,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSavings {
    pub energy: f64,
    pub cost: f64,
    pub co2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub time: String,
    pub actions: Vec<String>,
    pub zones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub recommendations: Vec<EnergyRecommendation>,
    pub projected_savings: ProjectedSavings,
    pub schedule: Vec<ScheduleSlot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialReadings {
    #[serde(default)]
    pub hvac: Option<HvacReading>,
    #[serde(default)]
    pub lighting: Option<LightingReading>,
    #[serde(default)]
    pub equipment: Option<EquipmentReading>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalData {
    #[serde(default)]
    pub building_id: Option<String>,
    #[serde(default)]
    pub readings: Option<PartialReadings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComfortAssessmentRequest {
    pub tenant_id: String,
    #[serde(default)]
    pub environmental_data: EnvironmentalData,
}

impl Validate for ComfortAssessmentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("tenantId", &self.tenant_id)?;
        if let Some(hvac) = self
            .environmental_data
            .readings
            .as_ref()
            .and_then(|r| r.hvac.as_ref())
        {
            ensure_range(
                "environmentalData.readings.hvac.humidity",
                hvac.humidity,
                0.0,
                100.0,
            )?;
            ensure_range(
                "environmentalData.readings.hvac.temperature",
                hvac.temperature,
                -40.0,
                60.0,
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComfortAssessment {
    pub tenant_id: String,
    /// 0..=1
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionComparison {
    /// Percent change against yesterday
    pub yesterday: f64,
    /// Percent change against the same day last week
    pub last_week: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaStatus {
    Normal,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConsumption {
    pub name: String,
    pub consumption: f64,
    pub status: AreaStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyOverview {
    /// kWh, the sum of all areas
    pub current_consumption: f64,
    pub comparison: ConsumptionComparison,
    pub areas: Vec<AreaConsumption>,
    pub suggestions: Vec<String>,
}

impl EnergyOverview {
    pub fn new(
        comparison: ConsumptionComparison,
        areas: Vec<AreaConsumption>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            current_consumption: areas.iter().map(|a| a.consumption).sum(),
            comparison,
            areas,
            suggestions,
        }
    }
}

/// Look-back window for energy monitoring, written as `<n>m`, `<n>h` or `<n>d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange(Duration);

impl TimeRange {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        let invalid = || {
            ValidationError::new("timeRange", format!("expected e.g. 24h or 7d, got '{}'", raw))
        };
        let unit = raw.chars().last().ok_or_else(invalid)?;
        let amount: u64 = raw[..raw.len() - unit.len_utf8()]
            .parse()
            .map_err(|_| invalid())?;
        let secs = match unit {
            'm' => amount.saturating_mul(60),
            'h' => amount.saturating_mul(3600),
            'd' => amount.saturating_mul(24 * 3600),
            _ => return Err(invalid()),
        };
        let range = Duration::from_secs(secs);
        if range.is_zero() || range > MAX_MONITORING_RANGE {
            return Err(ValidationError::new("timeRange", "must be between 1m and 30d"));
        }
        Ok(Self(range))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }
}
