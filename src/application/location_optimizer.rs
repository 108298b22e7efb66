// Location optimizer - Monte Carlo risk scoring of a brand combination at a site
use crate::application::capabilities::Predictor;
use crate::application::error::{with_timeout, CapabilityError};
use crate::domain::leasing::{
    BrandInfo, CompetitionIndex, CustomerFlowPrediction, LocationData, RankedCombination,
    RiskAnalysis, RiskScore,
};
use crate::infrastructure::config::LeasingPolicy;
use futures::{StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const CAPABILITY: &str = "location model";

/// Share of a week's visitors per weekday, Monday first
const WEEKLY_PROFILE: [f64; 7] = [0.85, 0.8, 0.85, 0.9, 1.05, 1.3, 1.25];
/// Relative visitor volume per month, January first
const MONTHLY_PROFILE: [f64; 12] = [1.15, 0.95, 0.9, 0.95, 1.05, 0.95, 1.0, 1.0, 0.95, 1.1, 1.0, 1.0];
const DAYS_PER_MONTH: f64 = 30.0;

/// Jitter sequence steps (fractional parts of the golden ratio and sqrt 2)
const JITTER_ALPHA: f64 = 0.618_033_988_749_895;
const JITTER_BETA: f64 = 0.414_213_562_373_095;

pub const PROCEED: &str = "建议继续推进，风险较低";
pub const OPTIMIZE_MIX: &str = "需要进行品牌组合优化";
pub const REEVALUATE: &str = "建议重新评估选址方案";

#[derive(Clone)]
pub struct LocationOptimizer {
    predictor: Arc<dyn Predictor>,
    policy: LeasingPolicy,
    timeout: Duration,
}

impl LocationOptimizer {
    pub fn new(predictor: Arc<dyn Predictor>, policy: LeasingPolicy, timeout: Duration) -> Self {
        Self {
            predictor,
            policy,
            timeout,
        }
    }

    pub async fn analyze_brand_combination(
        &self,
        brands: &[BrandInfo],
        location: &LocationData,
    ) -> Result<RiskAnalysis, CapabilityError> {
        let features = self.assemble_features(brands, location);
        let outcomes = self.run_simulations(&features).await?;

        let risk_score = risk_score(&outcomes);
        let recommendations = self.recommend(&risk_score);

        tracing::debug!(
            brands = brands.len(),
            simulations = outcomes.len(),
            score = risk_score.score,
            "Brand combination analyzed"
        );

        Ok(RiskAnalysis {
            risk_score,
            competition_index: competition_index(brands),
            customer_flow_prediction: self.predict_customer_flow(brands, location),
            recommendations,
        })
    }

    /// Analyze every combination and rank them best first
    pub async fn analyze_combinations(
        &self,
        combinations: &[Vec<BrandInfo>],
        location: &LocationData,
    ) -> Result<Vec<RankedCombination>, CapabilityError> {
        let mut ranked = Vec::with_capacity(combinations.len());
        for combination in combinations {
            let analysis = self.analyze_brand_combination(combination, location).await?;
            let score = self.combination_score(&analysis);
            ranked.push(RankedCombination {
                combination: combination.clone(),
                analysis,
                score,
            });
        }
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }

    pub fn combination_score(&self, analysis: &RiskAnalysis) -> f64 {
        let flow = normalize(analysis.customer_flow_prediction.daily, self.policy.flow_cap);
        analysis.risk_score.score * 0.3
            + (1.0 - analysis.competition_index.overall_index) * 0.3
            + flow * 0.4
    }

    fn assemble_features(&self, brands: &[BrandInfo], location: &LocationData) -> Vec<f64> {
        let mut features = Vec::with_capacity(brands.len() * 13 + 4);
        for brand in brands {
            features.extend_from_slice(&brand.category_one_hot());
            features.push(brand.market_share);
            features.push(brand.price_level / 5.0);
            features.push(normalize(brand.target_customer_base.len() as f64, 10.0));
        }
        features.push(normalize(location.traffic_flow, self.policy.traffic_cap));
        features.push(normalize(
            location.nearby_competitors.len() as f64,
            self.policy.competitor_cap,
        ));
        features.push(demographic_score(location));
        features.push(accessibility_score(location));
        features
    }

    /// Deterministic low-discrepancy perturbation of every feature
    fn perturb(&self, features: &[f64], run: usize) -> Vec<f64> {
        features
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let u = ((run + 1) as f64 * JITTER_ALPHA + (idx + 1) as f64 * JITTER_BETA).fract();
                value * (1.0 + self.policy.jitter * (2.0 * u - 1.0))
            })
            .collect()
    }

    async fn run_simulations(&self, features: &[f64]) -> Result<Vec<f64>, CapabilityError> {
        let runs = self.policy.simulation_count.max(1);
        let concurrency = self.policy.max_concurrent_predictions.max(1);

        let simulations = futures::stream::iter(0..runs)
            .map(|run| {
                let perturbed = self.perturb(features, run);
                let predictor = self.predictor.clone();
                async move { predictor.predict(&perturbed).await }
            })
            .buffered(concurrency)
            .and_then(|output| async move { success_probability(&output) })
            .try_collect::<Vec<f64>>();

        with_timeout(CAPABILITY, self.timeout, simulations).await
    }

    fn predict_customer_flow(
        &self,
        brands: &[BrandInfo],
        location: &LocationData,
    ) -> CustomerFlowPrediction {
        let access_factor = 0.5 + 0.5 * accessibility_score(location);
        let brand_draw = brands.iter().map(|b| b.market_share).sum::<f64>().min(1.0);
        let daily = (location.traffic_flow * access_factor * brand_draw).round();

        CustomerFlowPrediction {
            daily,
            weekly: WEEKLY_PROFILE.iter().map(|f| (daily * f).round()).collect(),
            seasonal: MONTHLY_PROFILE
                .iter()
                .map(|f| (daily * f * DAYS_PER_MONTH).round())
                .collect(),
        }
    }

    fn recommend(&self, risk: &RiskScore) -> Vec<String> {
        let advice = if risk.score > self.policy.proceed_threshold {
            PROCEED
        } else if risk.score > self.policy.optimize_threshold {
            OPTIMIZE_MIX
        } else {
            REEVALUATE
        };
        vec![advice.to_string()]
    }
}

fn success_probability(output: &[f64]) -> Result<f64, CapabilityError> {
    match output.first() {
        Some(p) if p.is_finite() => Ok(p.clamp(0.0, 1.0)),
        Some(_) => Err(CapabilityError::malformed(CAPABILITY, "non-finite probability")),
        None => Err(CapabilityError::malformed(CAPABILITY, "empty output")),
    }
}

fn normalize(value: f64, cap: f64) -> f64 {
    if cap <= 0.0 {
        return 0.0;
    }
    (value / cap).clamp(0.0, 1.0)
}

fn demographic_score(location: &LocationData) -> f64 {
    (location.demographics.income_level + location.demographics.consumption_power) / 20.0
}

fn accessibility_score(location: &LocationData) -> f64 {
    let infra = &location.infrastructure;
    (infra.parking + infra.public_transport + infra.walkability) / 30.0
}

pub fn risk_score(outcomes: &[f64]) -> RiskScore {
    if outcomes.is_empty() {
        return RiskScore {
            score: 0.0,
            confidence: 0.0,
            volatility: 0.0,
        };
    }
    let n = outcomes.len() as f64;
    let mean = outcomes.iter().sum::<f64>() / n;
    let variance = outcomes.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    RiskScore {
        score: mean,
        confidence: (1.0 - variance.sqrt()).clamp(0.0, 1.0),
        volatility: variance,
    }
}

/// Pairwise competition in 0..=1 with a zero diagonal
pub fn competition_score(a: &BrandInfo, b: &BrandInfo) -> f64 {
    if a.category.trim() == b.category.trim() {
        let proximity = 1.0 - (a.price_level - b.price_level).abs() / 4.0;
        0.6 + 0.4 * proximity.clamp(0.0, 1.0)
    } else {
        0.3 * customer_overlap(a, b)
    }
}

fn customer_overlap(a: &BrandInfo, b: &BrandInfo) -> f64 {
    let left: HashSet<&str> = a.target_customer_base.iter().map(String::as_str).collect();
    let right: HashSet<&str> = b.target_customer_base.iter().map(String::as_str).collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

pub fn competition_index(brands: &[BrandInfo]) -> CompetitionIndex {
    let n = brands.len();
    let matrix: Vec<Vec<f64>> = brands
        .iter()
        .enumerate()
        .map(|(i, a)| {
            brands
                .iter()
                .enumerate()
                .map(|(j, b)| if i == j { 0.0 } else { competition_score(a, b) })
                .collect()
        })
        .collect();

    let overall_index = if n < 2 {
        0.0
    } else {
        let total: f64 = matrix.iter().flatten().sum();
        total / (n * (n - 1)) as f64
    };

    CompetitionIndex {
        matrix,
        overall_index,
    }
}
