// Presentation layer - HTTP surface for the browser UI
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod routes;
