// Domain layer - Plain records for each dashboard section
pub mod asset;
pub mod consumer;
pub mod guide;
pub mod leasing;
pub mod merchant;
pub mod module;
pub mod operations;
pub mod validation;
