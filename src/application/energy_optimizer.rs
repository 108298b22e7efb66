// Energy optimizer - load recommendations, hourly schedule and comfort scoring
use crate::application::capabilities::Predictor;
use crate::application::error::{with_timeout, CapabilityError};
use crate::domain::operations::{
    EnergyData, EnergyRecommendation, EnvironmentalData, HvacReading, OptimizationResult,
    Priority, ProjectedSavings, ScheduleSlot, TenantPreference,
};
use crate::infrastructure::config::{ComfortPolicy, EnergyPolicy};
use std::sync::Arc;
use std::time::Duration;

const CAPABILITY: &str = "energy model";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Hvac,
    Lighting,
    Equipment,
}

impl Subsystem {
    pub const ALL: [Subsystem; 3] = [Subsystem::Hvac, Subsystem::Lighting, Subsystem::Equipment];

    pub fn id(self) -> &'static str {
        match self {
            Subsystem::Hvac => "hvac",
            Subsystem::Lighting => "lighting",
            Subsystem::Equipment => "equipment",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Subsystem::Hvac => "优化空调系统运行参数，实现智能温控",
            Subsystem::Lighting => "安装智能照明系统，根据自然光调节亮度",
            Subsystem::Equipment => "更新能效较低的设备，引入智能控制系统",
        }
    }

    fn scheduled_actions(self) -> [&'static str; 2] {
        match self {
            Subsystem::Hvac => ["调整空调温度设定", "优化新风量"],
            Subsystem::Lighting => ["调整照明亮度", "启用自然光感应"],
            Subsystem::Equipment => ["设备负载优化", "启动节能模式"],
        }
    }

    fn power(self, building: &EnergyData) -> f64 {
        let r = &building.readings;
        match self {
            Subsystem::Hvac => r.hvac.power,
            Subsystem::Lighting => r.lighting.power,
            Subsystem::Equipment => r.equipment.power,
        }
    }

    fn implementation_cost(self, policy: &EnergyPolicy) -> f64 {
        match self {
            Subsystem::Hvac => policy.hvac_cost,
            Subsystem::Lighting => policy.lighting_cost,
            Subsystem::Equipment => policy.equipment_cost,
        }
    }
}

#[derive(Clone)]
pub struct EnergyOptimizer {
    predictor: Arc<dyn Predictor>,
    policy: EnergyPolicy,
    timeout: Duration,
}

impl EnergyOptimizer {
    pub fn new(predictor: Arc<dyn Predictor>, policy: EnergyPolicy, timeout: Duration) -> Self {
        Self {
            predictor,
            policy,
            timeout,
        }
    }

    pub async fn optimize(
        &self,
        building: &EnergyData,
        tenants: &[TenantPreference],
    ) -> Result<OptimizationResult, CapabilityError> {
        let features = assemble_features(building, tenants);
        let output = with_timeout(CAPABILITY, self.timeout, self.predictor.predict(&features)).await?;
        let fractions = load_fractions(&output)?;

        let recommendations: Vec<EnergyRecommendation> = Subsystem::ALL
            .iter()
            .zip(fractions)
            .filter_map(|(&subsystem, fraction)| self.recommend(subsystem, building, fraction))
            .collect();

        let recommended: Vec<Subsystem> = Subsystem::ALL
            .iter()
            .copied()
            .filter(|s| recommendations.iter().any(|r| r.kind == s.id()))
            .collect();

        tracing::debug!(
            building = %building.building_id,
            recommended = recommendations.len(),
            "Energy optimization computed"
        );

        Ok(OptimizationResult {
            projected_savings: self.projected_savings(&recommendations),
            schedule: self.schedule(&recommended, tenants),
            recommendations,
        })
    }

    fn recommend(
        &self,
        subsystem: Subsystem,
        building: &EnergyData,
        optimal_fraction: f64,
    ) -> Option<EnergyRecommendation> {
        let saving_ratio = (1.0 - optimal_fraction).clamp(0.0, 1.0);
        if saving_ratio < self.policy.min_saving_ratio {
            return None;
        }
        let expected_savings =
            subsystem.power(building) * saving_ratio * self.policy.annual_operating_hours;
        let implementation_cost = subsystem.implementation_cost(&self.policy);
        let roi = if implementation_cost > 0.0 {
            expected_savings * self.policy.tariff / implementation_cost
        } else {
            0.0
        };
        Some(EnergyRecommendation {
            kind: subsystem.id().to_string(),
            description: subsystem.description().to_string(),
            expected_savings,
            implementation_cost,
            roi,
            priority: self.priority(roi),
        })
    }

    fn priority(&self, roi: f64) -> Priority {
        if roi >= self.policy.high_priority_roi {
            Priority::High
        } else if roi >= self.policy.medium_priority_roi {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    fn projected_savings(&self, recommendations: &[EnergyRecommendation]) -> ProjectedSavings {
        let energy: f64 = recommendations.iter().map(|r| r.expected_savings).sum();
        ProjectedSavings {
            energy,
            cost: energy * self.policy.tariff,
            co2: energy * self.policy.emission_factor,
        }
    }

    /// Hours with no applicable action are left out
    fn schedule(&self, recommended: &[Subsystem], tenants: &[TenantPreference]) -> Vec<ScheduleSlot> {
        (0..24)
            .filter_map(|hour| {
                let mut zones: Vec<String> = tenants
                    .iter()
                    .filter(|t| t.operating_hours.contains_hour(hour))
                    .map(|t| t.zone.clone())
                    .collect();
                zones.sort();
                zones.dedup();

                let actions: Vec<String> = recommended
                    .iter()
                    .filter(|s| match s {
                        Subsystem::Lighting => {
                            hour >= self.policy.lighting_start_hour
                                && hour <= self.policy.lighting_end_hour
                        }
                        Subsystem::Hvac | Subsystem::Equipment => !zones.is_empty(),
                    })
                    .flat_map(|s| s.scheduled_actions())
                    .map(str::to_string)
                    .collect();

                (!actions.is_empty()).then(|| ScheduleSlot {
                    time: format!("{:02}:00", hour),
                    actions,
                    zones,
                })
            })
            .collect()
    }

    pub fn assess_comfort(&self, data: &EnvironmentalData) -> f64 {
        data.readings
            .as_ref()
            .and_then(|r| r.hvac.as_ref())
            .map(|hvac| comfort_score(hvac, &self.policy.comfort))
            .unwrap_or(0.0)
    }
}

fn tolerance_score(value: f64, optimum: f64, tolerance: f64) -> f64 {
    if tolerance <= 0.0 {
        return if value == optimum { 1.0 } else { 0.0 };
    }
    (1.0 - (value - optimum).abs() / tolerance).max(0.0)
}

pub fn comfort_score(hvac: &HvacReading, policy: &ComfortPolicy) -> f64 {
    let temperature = tolerance_score(
        hvac.temperature,
        policy.optimal_temperature,
        policy.temperature_tolerance,
    );
    let humidity = tolerance_score(hvac.humidity, policy.optimal_humidity, policy.humidity_tolerance);
    temperature * policy.temperature_weight
        + humidity * policy.humidity_weight
        + policy.air_quality_score * policy.air_quality_weight
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Readings, zone averages, then tenant comfort band midpoints
pub fn assemble_features(building: &EnergyData, tenants: &[TenantPreference]) -> Vec<f64> {
    let r = &building.readings;
    let zones = &building.zones;
    vec![
        r.hvac.temperature,
        r.hvac.humidity,
        r.hvac.power,
        r.lighting.power,
        r.lighting.brightness,
        r.equipment.power,
        r.equipment.utilization,
        zones.len() as f64,
        mean(zones.iter().map(|z| z.occupancy)),
        mean(zones.iter().map(|z| z.temperature)),
        mean(zones.iter().map(|z| z.humidity)),
        tenants.len() as f64,
        mean(tenants.iter().map(|t| (t.temperature_range.min + t.temperature_range.max) / 2.0)),
        mean(tenants.iter().map(|t| (t.humidity_range.min + t.humidity_range.max) / 2.0)),
    ]
}

fn load_fractions(output: &[f64]) -> Result<[f64; 3], CapabilityError> {
    match output {
        [hvac, lighting, equipment, ..] if output[..3].iter().all(|v| v.is_finite()) => {
            Ok([*hvac, *lighting, *equipment])
        }
        [_, _, _, ..] => Err(CapabilityError::malformed(CAPABILITY, "non-finite load fraction")),
        _ => Err(CapabilityError::malformed(
            CAPABILITY,
            format!("expected 3 load fractions, got {}", output.len()),
        )),
    }
}
