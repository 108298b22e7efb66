// Operations service - Use cases for briefings, emergencies and energy management
use crate::application::catalog::DashboardCatalog;
use crate::application::energy_optimizer::EnergyOptimizer;
use crate::application::error::ServiceResult;
use crate::application::operations_assistant::OperationsAssistant;
use crate::domain::operations::{
    ComfortAssessment, ComfortAssessmentRequest, EmergencyOverview, EmergencyResponse,
    EnergyData, EnergyOptimizationRequest, EnergyOverview, HandleEmergencyRequest,
    MorningBriefing, MorningReport, MorningReportRequest, OptimizationResult, TimeRange,
};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct OperationsService {
    catalog: Arc<dyn DashboardCatalog>,
    assistant: OperationsAssistant,
    energy: EnergyOptimizer,
}

impl OperationsService {
    pub fn new(
        catalog: Arc<dyn DashboardCatalog>,
        assistant: OperationsAssistant,
        energy: EnergyOptimizer,
    ) -> Self {
        Self {
            catalog,
            assistant,
            energy,
        }
    }

    pub async fn morning_briefing(&self) -> ServiceResult<MorningBriefing> {
        Ok(self.catalog.morning_briefing().await?)
    }

    pub async fn energy_overview(&self) -> ServiceResult<EnergyOverview> {
        Ok(self.catalog.energy_overview().await?)
    }

    pub async fn emergency_overview(&self) -> ServiceResult<EmergencyOverview> {
        Ok(self.catalog.emergency_overview().await?)
    }

    pub async fn morning_report(&self, request: &MorningReportRequest) -> ServiceResult<MorningReport> {
        Ok(self
            .assistant
            .generate_morning_report(request.date, &request.store_data)
            .await?)
    }

    pub async fn handle_emergency(
        &self,
        request: &HandleEmergencyRequest,
    ) -> ServiceResult<EmergencyResponse> {
        Ok(self
            .assistant
            .handle_emergency(&request.event_type, &request.event_data)
            .await?)
    }

    pub async fn optimize_energy(
        &self,
        request: &EnergyOptimizationRequest,
    ) -> ServiceResult<OptimizationResult> {
        Ok(self
            .energy
            .optimize(&request.building_data, &request.tenant_preferences)
            .await?)
    }

    /// `time_range` is parsed here so a bad value surfaces as a 400
    pub async fn energy_monitoring(
        &self,
        building_id: &str,
        time_range: &str,
    ) -> ServiceResult<Vec<EnergyData>> {
        let range = TimeRange::parse(time_range)?;
        let window = chrono::Duration::from_std(range.duration()).map_err(anyhow::Error::from)?;
        let since = Utc::now() - window;
        Ok(self.catalog.energy_readings(building_id, since).await?)
    }

    pub fn comfort_assessment(&self, request: &ComfortAssessmentRequest) -> ComfortAssessment {
        let score = self.energy.assess_comfort(&request.environmental_data);
        tracing::info!(
            tenant = %request.tenant_id,
            score,
            building = ?request.environmental_data.building_id,
            "Comfort assessed"
        );
        ComfortAssessment {
            tenant_id: request.tenant_id.clone(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::capabilities::fakes::{CannedText, FixedPredictor};
    use crate::domain::operations::EnvironmentalData;
    use crate::infrastructure::config::EnergyPolicy;
    use crate::infrastructure::static_catalog::StaticCatalog;
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn service() -> OperationsService {
        OperationsService::new(
            Arc::new(StaticCatalog::new()),
            OperationsAssistant::new(Arc::new(CannedText::new("概况")), Duration::from_secs(1)),
            EnergyOptimizer::new(
                Arc::new(FixedPredictor::new(vec![0.8, 0.7, 0.9])),
                EnergyPolicy::default(),
                Duration::from_secs(1),
            ),
        )
    }

    #[test]
    fn test_comfort_assessment_is_logged() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let request = ComfortAssessmentRequest {
            tenant_id: "t-7".into(),
            environmental_data: EnvironmentalData::default(),
        };
        let assessment =
            tracing::subscriber::with_default(subscriber, || service().comfort_assessment(&request));

        assert_eq!(assessment.tenant_id, "t-7");
        assert_eq!(assessment.score, 0.0);
        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Comfort assessed"));
        assert!(output.contains("tenant=t-7"));
    }
}
