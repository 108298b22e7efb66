// Consumer service - Use cases for recommendations, guide paths and AR sessions
use crate::application::ar_guide_service::ArGuideService;
use crate::application::catalog::DashboardCatalog;
use crate::application::error::ServiceResult;
use crate::domain::consumer::{ConsumerRecommendations, GuidePathOverview, StatusAnalysis};
use crate::domain::guide::{GuideEvent, StartGuideRequest};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct ConsumerService {
    catalog: Arc<dyn DashboardCatalog>,
    guide: ArGuideService,
}

impl ConsumerService {
    pub fn new(catalog: Arc<dyn DashboardCatalog>, guide: ArGuideService) -> Self {
        Self { catalog, guide }
    }

    pub async fn recommendations(&self) -> ServiceResult<ConsumerRecommendations> {
        Ok(self.catalog.product_recommendations().await?)
    }

    /// Expired promotions are dropped, nearest points of interest first
    pub async fn guide_path(&self) -> ServiceResult<GuidePathOverview> {
        let overview = self.catalog.guide_path().await?;
        Ok(overview.current(Utc::now().date_naive()))
    }

    pub async fn status_analysis(&self) -> ServiceResult<StatusAnalysis> {
        Ok(self.catalog.status_analysis().await?)
    }

    pub async fn start_guide(
        &self,
        request: &StartGuideRequest,
    ) -> ServiceResult<mpsc::Receiver<GuideEvent>> {
        self.guide.start_guide(request).await
    }
}
