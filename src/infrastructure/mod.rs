// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_gateway;
pub mod http_response;
pub mod record_mapper;
pub mod report_renderer;
