// Virtual store simulator - day-by-day revenue and traffic projection for one brand
use crate::application::capabilities::Predictor;
use crate::application::error::{with_timeout, CapabilityError};
use crate::domain::leasing::{
    BrandInfo, LocationData, OperationalCosts, ScenarioOutcome, SimulationConfig,
    SimulationOverrides, SimulationResult, StoreKpis,
};
use crate::infrastructure::config::SimulationPolicy;
use chrono::{Datelike, Days, NaiveDate};
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;

const CAPABILITY: &str = "store model";
const OUTPUTS_PER_DAY: usize = 4;

/// Share of a day's visitors arriving in `hour`
pub fn hourly_share(hour: u32) -> f64 {
    match hour {
        17..=20 => 0.08,
        10..=21 => 0.05,
        _ => 0.02,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DayOutcome {
    revenue: f64,
    customers: f64,
    conversion: f64,
    ticket: f64,
}

#[derive(Clone)]
pub struct StoreSimulator {
    predictor: Arc<dyn Predictor>,
    policy: SimulationPolicy,
    timeout: Duration,
}

impl StoreSimulator {
    pub fn new(predictor: Arc<dyn Predictor>, policy: SimulationPolicy, timeout: Duration) -> Self {
        Self {
            predictor,
            policy,
            timeout,
        }
    }

    /// Fill unset fields from the configured defaults
    pub fn resolve_config(&self, overrides: &SimulationOverrides, today: NaiveDate) -> SimulationConfig {
        SimulationConfig {
            start_date: overrides.start_date.unwrap_or(today),
            duration: overrides.duration.unwrap_or(self.policy.default_duration).max(1),
            customer_volume: overrides
                .customer_volume
                .unwrap_or(self.policy.default_customer_volume),
            seasonality: overrides
                .seasonality
                .clone()
                .unwrap_or_else(|| vec![1.0; 12]),
            special_events: overrides.special_events.clone().unwrap_or_default(),
        }
    }

    pub async fn simulate_store(
        &self,
        brand: &BrandInfo,
        location: &LocationData,
        overrides: &SimulationOverrides,
        today: NaiveDate,
    ) -> Result<SimulationResult, CapabilityError> {
        let config = self.resolve_config(overrides, today);
        let base = self.base_features(brand, location, &config);
        let days = self.run_days(&base, &config).await?;
        let result = self.summarize(&days, &config);

        tracing::debug!(
            brand = %brand.id,
            days = config.duration,
            roi = result.kpis.roi,
            "Store simulation finished"
        );

        Ok(result)
    }

    /// Simulate each scenario and score its impact
    pub async fn scenario_analysis(
        &self,
        brand: &BrandInfo,
        location: &LocationData,
        scenarios: &[SimulationOverrides],
        today: NaiveDate,
    ) -> Result<Vec<ScenarioOutcome>, CapabilityError> {
        let mut outcomes = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            let simulation = self.simulate_store(brand, location, scenario, today).await?;
            let impact = self.scenario_impact(&simulation);
            outcomes.push(ScenarioOutcome {
                scenario: scenario.clone(),
                simulation,
                impact,
            });
        }
        Ok(outcomes)
    }

    pub fn scenario_impact(&self, simulation: &SimulationResult) -> f64 {
        let ticket = if self.policy.ticket_cap > 0.0 {
            (simulation.average_ticket_size / self.policy.ticket_cap).min(1.0)
        } else {
            0.0
        };
        simulation.kpis.roi * 0.4
            + simulation.kpis.profit_margin * 0.3
            + simulation.conversion_rate * 0.15
            + ticket * 0.15
    }

    fn base_features(
        &self,
        brand: &BrandInfo,
        location: &LocationData,
        config: &SimulationConfig,
    ) -> Vec<f64> {
        let mut features = vec![brand.market_share, brand.price_level];
        features.extend_from_slice(&brand.category_one_hot());
        features.extend_from_slice(&[
            location.traffic_flow,
            location.demographics.population,
            location.demographics.income_level,
            location.infrastructure.parking,
            location.infrastructure.public_transport,
            config.customer_volume,
        ]);
        features.extend_from_slice(&config.seasonality);
        features
    }

    /// Seasonality of the day's calendar month plus the impact of events on that date
    fn demand_factor(config: &SimulationConfig, date: NaiveDate) -> f64 {
        let seasonal = config
            .seasonality
            .get(date.month0() as usize)
            .copied()
            .unwrap_or(1.0);
        let events: f64 = config
            .special_events
            .iter()
            .filter(|event| event.date == date)
            .map(|event| event.impact)
            .sum();
        seasonal + events
    }

    async fn run_days(
        &self,
        base: &[f64],
        config: &SimulationConfig,
    ) -> Result<Vec<DayOutcome>, CapabilityError> {
        let concurrency = self.policy.max_concurrent_predictions.max(1);

        futures::stream::iter(0..config.duration)
            .map(|day| {
                let date = config
                    .start_date
                    .checked_add_days(Days::new(day as u64))
                    .unwrap_or(config.start_date);
                let factor = Self::demand_factor(config, date);
                let features: Vec<f64> = base.iter().map(|f| f * factor).collect();
                let predictor = self.predictor.clone();
                let timeout = self.timeout;
                async move {
                    let output =
                        with_timeout(CAPABILITY, timeout, predictor.predict(&features)).await?;
                    parse_day(&output)
                }
            })
            .buffered(concurrency)
            .try_collect()
            .await
    }

    fn summarize(&self, days: &[DayOutcome], config: &SimulationConfig) -> SimulationResult {
        let n = days.len().max(1) as f64;
        let daily_revenue: Vec<f64> = days.iter().map(|d| d.revenue).collect();
        let customer_flow: Vec<f64> = days.iter().map(|d| d.customers).collect();
        let conversion_rate = days.iter().map(|d| d.conversion).sum::<f64>() / n;
        let average_ticket_size = days.iter().map(|d| d.ticket).sum::<f64>() / n;

        let total_revenue: f64 = daily_revenue.iter().sum();
        let operational_costs = OperationalCosts {
            rent: total_revenue * self.policy.rent_ratio,
            labor: total_revenue * self.policy.labor_ratio,
            utilities: total_revenue * self.policy.utilities_ratio,
            marketing: total_revenue * self.policy.marketing_ratio,
        };
        let kpis = kpis(total_revenue, operational_costs.total(), config.duration);

        SimulationResult {
            peak_hours: peak_hours(&customer_flow),
            daily_revenue,
            customer_flow,
            conversion_rate,
            average_ticket_size,
            operational_costs,
            kpis,
        }
    }
}

fn parse_day(output: &[f64]) -> Result<DayOutcome, CapabilityError> {
    if output.len() < OUTPUTS_PER_DAY {
        return Err(CapabilityError::malformed(
            CAPABILITY,
            format!("expected {} outputs, got {}", OUTPUTS_PER_DAY, output.len()),
        ));
    }
    if output[..OUTPUTS_PER_DAY].iter().any(|v| !v.is_finite()) {
        return Err(CapabilityError::malformed(CAPABILITY, "non-finite output"));
    }
    Ok(DayOutcome {
        revenue: output[0].max(0.0),
        customers: output[1].max(0.0),
        conversion: output[2].clamp(0.0, 1.0),
        ticket: output[3].max(0.0),
    })
}

fn kpis(revenue: f64, costs: f64, duration: u32) -> StoreKpis {
    let profit = revenue - costs;
    StoreKpis {
        roi: if costs > 0.0 { profit / costs } else { 0.0 },
        payback_period: (profit > 0.0).then(|| costs / (profit / duration.max(1) as f64)),
        profit_margin: if revenue > 0.0 { profit / revenue } else { 0.0 },
    }
}

fn peak_hours(customer_flow: &[f64]) -> Vec<f64> {
    let total: f64 = customer_flow.iter().sum();
    (0..24).map(|hour| total * hourly_share(hour)).collect()
}
