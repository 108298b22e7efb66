// Asset service - Use case for ESG and data asset evaluation
use crate::application::catalog::DashboardCatalog;
use crate::application::error::ServiceResult;
use crate::domain::asset::AssetEvaluation;
use std::sync::Arc;

#[derive(Clone)]
pub struct AssetService {
    catalog: Arc<dyn DashboardCatalog>,
}

impl AssetService {
    pub fn new(catalog: Arc<dyn DashboardCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn evaluation(&self) -> ServiceResult<AssetEvaluation> {
        Ok(self.catalog.asset_evaluation().await?)
    }
}
