// Application layer - Use cases and the capability seams they depend on
pub mod ar_guide_service;
pub mod asset_service;
pub mod capabilities;
pub mod catalog;
pub mod consumer_service;
pub mod energy_optimizer;
pub mod error;
pub mod leasing_service;
pub mod location_optimizer;
pub mod merchant_service;
pub mod operations_assistant;
pub mod operations_service;
pub mod store_simulator;
