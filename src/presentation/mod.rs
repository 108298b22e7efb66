// Presentation layer - HTTP surface and the navigation shell
pub mod app_state;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod shell;
