// Consumer domain models - product recommendations, guide path and floor status
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductItem {
    pub brand: String,
    pub name: String,
    pub price: f64,
    /// Multiplier applied to `price`; 1.0 means no discount
    pub discount: f64,
    pub discounted_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ProductItem {
    pub fn new(brand: &str, name: &str, price: f64, discount: f64, location: Option<&str>) -> Self {
        let discounted_price = (price * discount * 100.0).round() / 100.0;
        Self {
            brand: brand.to_string(),
            name: name.to_string(),
            price,
            discount,
            discounted_price,
            location: location.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub items: Vec<ProductItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub style: Vec<String>,
    pub price_range: String,
    pub favorite_brands: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerRecommendations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<UserPreferences>,
    pub recommendations: Vec<RecommendationGroup>,
    #[serde(default)]
    pub seasonal_trends: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideLocation {
    pub floor: i32,
    pub zone: String,
    pub coordinates: FloorPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathStop {
    pub floor: i32,
    pub zone: String,
    pub shop: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    pub description: String,
    /// Metres from the current location
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub shop: String,
    pub offer: String,
    pub valid_until: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidePathOverview {
    pub current_location: GuideLocation,
    pub recommended_path: Vec<PathStop>,
    pub points_of_interest: Vec<PointOfInterest>,
    pub promotions: Vec<Promotion>,
}

impl GuidePathOverview {
    /// Drop promotions that ended before `today` and order points of interest by distance
    pub fn current(mut self, today: NaiveDate) -> Self {
        self.promotions.retain(|p| p.valid_until >= today);
        self.points_of_interest
            .sort_by(|a, b| a.distance.total_cmp(&b.distance));
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotspot {
    pub location: String,
    /// Percent of capacity
    pub density: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdDensity {
    pub overall: f64,
    pub hotspots: Vec<Hotspot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodFactor {
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingMood {
    pub overall: String,
    pub factors: Vec<MoodFactor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeMetrics {
    /// Minutes
    pub average_stay_time: f64,
    /// Percent
    pub conversion_rate: f64,
    /// Percent
    pub return_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusAnalysis {
    pub crowd_density: CrowdDensity,
    pub shopping_mood: ShoppingMood,
    pub real_time_metrics: RealTimeMetrics,
}
