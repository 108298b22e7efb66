// Asset domain models - ESG scores and data asset valuation
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsgScores {
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCategory {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAssets {
    /// Sum of the category values
    pub total_value: f64,
    pub growth: f64,
    pub categories: Vec<AssetCategory>,
}

impl DataAssets {
    pub fn new(growth: f64, categories: Vec<AssetCategory>) -> Self {
        Self {
            total_value: categories.iter().map(|c| c.value).sum(),
            growth,
            categories,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEvaluation {
    pub esg: EsgScores,
    pub data_assets: DataAssets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_value_is_category_sum() {
        let assets = DataAssets::new(
            0.15,
            vec![
                AssetCategory { name: "用户数据".into(), value: 500_000.0 },
                AssetCategory { name: "交易数据".into(), value: 400_000.0 },
                AssetCategory { name: "运营数据".into(), value: 300_000.0 },
            ],
        );
        assert_eq!(assets.total_value, 1_200_000.0);
    }
}
