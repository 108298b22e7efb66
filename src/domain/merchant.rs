// Merchant domain models
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantSummary {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSnapshot {
    pub today: f64,
    pub yesterday: f64,
    /// `(today - yesterday) / yesterday`; zero when there were no sales yesterday
    pub growth: f64,
}

impl SalesSnapshot {
    pub fn new(today: f64, yesterday: f64) -> Self {
        let growth = if yesterday > 0.0 {
            (today - yesterday) / yesterday
        } else {
            0.0
        };
        Self {
            today,
            yesterday,
            growth,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub stock: u32,
    pub threshold: u32,
}

impl InventoryItem {
    pub fn is_below_threshold(&self) -> bool {
        self.stock < self.threshold
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryStatus {
    /// Number of items below their restock threshold
    pub warning: usize,
    pub items: Vec<InventoryItem>,
}

impl InventoryStatus {
    /// Keeps only the items that need attention
    pub fn from_items(items: Vec<InventoryItem>) -> Self {
        let items: Vec<InventoryItem> = items
            .into_iter()
            .filter(InventoryItem::is_below_threshold)
            .collect();
        Self {
            warning: items.len(),
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantAnalysis {
    pub sales: SalesSnapshot,
    pub inventory: InventoryStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedDataLink {
    pub merchant: String,
    pub data_type: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationStats {
    /// Merchants currently sharing data
    pub shared_data: u32,
    pub total_volume: String,
    pub active_partners: u32,
    #[serde(default)]
    pub links: Vec<SharedDataLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyChainStats {
    pub vehicles: u32,
    /// Minutes
    pub avg_unload_time: f64,
    pub alerts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_is_derived_from_today_and_yesterday() {
        let sales = SalesSnapshot::new(85_600.0, 78_900.0);
        assert!((sales.growth - (85_600.0 - 78_900.0) / 78_900.0).abs() < 1e-12);

        let flat = SalesSnapshot::new(100.0, 0.0);
        assert_eq!(flat.growth, 0.0);
    }

    #[test]
    fn test_warning_counts_items_below_threshold() {
        let status = InventoryStatus::from_items(vec![
            InventoryItem { name: "商品A".into(), stock: 5, threshold: 10 },
            InventoryItem { name: "商品B".into(), stock: 3, threshold: 8 },
            InventoryItem { name: "商品C".into(), stock: 40, threshold: 12 },
        ]);
        assert_eq!(status.warning, 2);
        assert_eq!(status.items.len(), 2);
    }
}
