// Configuration - serde defaults, optional config/dashboard.toml, environment overlay
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "config/dashboard.toml";
const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub leasing: LeasingPolicy,
    #[serde(default)]
    pub simulation: SimulationPolicy,
    #[serde(default)]
    pub energy: EnergyPolicy,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub ar: ArSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    /// `production` hides internal error detail from clients
    pub environment: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: "development".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerSettings {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Location optimizer policy. The thresholds are uncalibrated placeholders.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LeasingPolicy {
    pub simulation_count: usize,
    pub max_concurrent_predictions: usize,
    /// Relative amplitude of the Monte Carlo feature jitter
    pub jitter: f64,
    pub proceed_threshold: f64,
    pub optimize_threshold: f64,
    /// Daily traffic treated as 1.0 when normalizing
    pub traffic_cap: f64,
    /// Competitor count treated as 1.0 when normalizing
    pub competitor_cap: f64,
    /// Daily customer flow treated as 1.0 when ranking combinations
    pub flow_cap: f64,
}

impl Default for LeasingPolicy {
    fn default() -> Self {
        Self {
            simulation_count: 100,
            max_concurrent_predictions: 8,
            jitter: 0.05,
            proceed_threshold: 0.7,
            optimize_threshold: 0.4,
            traffic_cap: 50_000.0,
            competitor_cap: 20.0,
            flow_cap: 10_000.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationPolicy {
    pub default_duration: u32,
    pub max_concurrent_predictions: usize,
    pub default_customer_volume: f64,
    pub rent_ratio: f64,
    pub labor_ratio: f64,
    pub utilities_ratio: f64,
    pub marketing_ratio: f64,
    /// Ticket size treated as 1.0 when scoring scenarios
    pub ticket_cap: f64,
}

impl Default for SimulationPolicy {
    fn default() -> Self {
        Self {
            default_duration: 365,
            max_concurrent_predictions: 8,
            default_customer_volume: 1000.0,
            rent_ratio: 0.10,
            labor_ratio: 0.15,
            utilities_ratio: 0.05,
            marketing_ratio: 0.08,
            ticket_cap: 1000.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EnergyPolicy {
    /// Minimum predicted load reduction before a subsystem is recommended
    pub min_saving_ratio: f64,
    /// Currency per kWh
    pub tariff: f64,
    /// kg CO2 per kWh
    pub emission_factor: f64,
    pub annual_operating_hours: f64,
    pub hvac_cost: f64,
    pub lighting_cost: f64,
    pub equipment_cost: f64,
    pub high_priority_roi: f64,
    pub medium_priority_roi: f64,
    pub lighting_start_hour: u32,
    pub lighting_end_hour: u32,
    pub comfort: ComfortPolicy,
}

impl Default for EnergyPolicy {
    fn default() -> Self {
        Self {
            min_saving_ratio: 0.05,
            tariff: 0.8,
            emission_factor: 0.5,
            annual_operating_hours: 365.0 * 14.0,
            hvac_cost: 50_000.0,
            lighting_cost: 30_000.0,
            equipment_cost: 100_000.0,
            high_priority_roi: 2.0,
            medium_priority_roi: 1.0,
            lighting_start_hour: 8,
            lighting_end_hour: 22,
            comfort: ComfortPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ComfortPolicy {
    pub optimal_temperature: f64,
    pub temperature_tolerance: f64,
    pub optimal_humidity: f64,
    pub humidity_tolerance: f64,
    pub temperature_weight: f64,
    pub humidity_weight: f64,
    pub air_quality_weight: f64,
    /// Used until an air quality sensor feed exists
    pub air_quality_score: f64,
}

impl Default for ComfortPolicy {
    fn default() -> Self {
        Self {
            optimal_temperature: 24.0,
            temperature_tolerance: 2.0,
            optimal_humidity: 50.0,
            humidity_tolerance: 10.0,
            temperature_weight: 0.4,
            humidity_weight: 0.3,
            air_quality_weight: 0.3,
            air_quality_score: 0.8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Model serving endpoint. Without an endpoint the prediction-backed
/// operations answer 503.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelSettings {
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    pub location_model: String,
    pub store_model: String,
    pub energy_model: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
            location_model: "location-risk".to_string(),
            store_model: "virtual-store".to_string(),
            energy_model: "energy-optimizer".to_string(),
        }
    }
}

impl ModelSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The endpoint, unless it is missing or blank
    pub fn configured_endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArSettings {
    pub frame_interval_ms: u64,
    /// Frame budget of one guide session
    pub max_frames: u64,
    pub render_timeout_ms: u64,
    pub fov_degrees: f64,
    pub marker_radius: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for ArSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33,
            max_frames: 90,
            render_timeout_ms: 500,
            fov_degrees: 75.0,
            marker_radius: 0.2,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

impl ArSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_from(Path::new(DEFAULT_CONFIG_FILE), &env)
}

/// Layers, lowest first: serde defaults, the optional file, `DASHBOARD__SECTION__KEY`
/// variables, then the bare `PORT`, `NODE_ENV` and `OPENAI_API_KEY` variables.
pub fn load_from(file: &Path, env: &HashMap<String, String>) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from(file).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone().into_iter().collect())),
        )
        .set_override_option("server.port", env.get("PORT").cloned())?
        .set_override_option("server.environment", env.get("NODE_ENV").cloned())?
        .set_override_option("llm.api_key", env.get("OPENAI_API_KEY").cloned())?
        .build()?;

    Ok(settings.try_deserialize()?)
}
