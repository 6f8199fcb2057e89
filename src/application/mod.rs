// Application layer - Scoring engine and use cases
pub mod aggregation;
pub mod classification;
pub mod dashboard_service;
pub mod inspection_gateway;
pub mod inspection_service;
pub mod profile_service;
pub mod report;
pub mod scoring;
pub mod upload;
