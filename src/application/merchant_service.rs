// Merchant service - Use cases for merchant listing, sales and supply figures
use crate::application::catalog::DashboardCatalog;
use crate::application::error::ServiceResult;
use crate::domain::merchant::{
    CollaborationStats, InventoryStatus, MerchantAnalysis, MerchantSummary, SupplyChainStats,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct MerchantService {
    catalog: Arc<dyn DashboardCatalog>,
}

impl MerchantService {
    pub fn new(catalog: Arc<dyn DashboardCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn list_merchants(&self) -> ServiceResult<Vec<MerchantSummary>> {
        Ok(self.catalog.merchants().await?)
    }

    pub async fn analysis(&self) -> ServiceResult<MerchantAnalysis> {
        let sales = self.catalog.sales().await?;
        let items = self.catalog.inventory().await?;
        Ok(MerchantAnalysis {
            sales,
            inventory: InventoryStatus::from_items(items),
        })
    }

    pub async fn collaboration(&self) -> ServiceResult<CollaborationStats> {
        Ok(self.catalog.collaboration().await?)
    }

    pub async fn supply_chain(&self) -> ServiceResult<SupplyChainStats> {
        Ok(self.catalog.supply_chain().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::static_catalog::StaticCatalog;

    #[tokio::test]
    async fn test_analysis_counts_low_stock() {
        let service = MerchantService::new(Arc::new(StaticCatalog::new()));
        let analysis = service.analysis().await.unwrap();
        assert_eq!(analysis.inventory.warning, analysis.inventory.items.len());
        assert!(analysis.inventory.items.iter().all(|i| i.stock < i.threshold));
        let sales = &analysis.sales;
        assert!((sales.growth - (sales.today - sales.yesterday) / sales.yesterday).abs() < 1e-12);
    }
}
