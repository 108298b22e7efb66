// Application state for HTTP handlers
use crate::application::asset_service::AssetService;
use crate::application::consumer_service::ConsumerService;
use crate::application::leasing_service::LeasingService;
use crate::application::merchant_service::MerchantService;
use crate::application::operations_service::OperationsService;

#[derive(Clone)]
pub struct AppState {
    pub leasing_service: LeasingService,
    pub operations_service: OperationsService,
    pub consumer_service: ConsumerService,
    pub merchant_service: MerchantService,
    pub asset_service: AssetService,
    /// Include internal error detail in 5xx bodies (off in production)
    pub verbose_errors: bool,
}
