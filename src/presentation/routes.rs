// Router for the browser UI
use crate::application::upload::MAX_UPLOAD_BYTES;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    analyze, create_report, dashboard, delete_inspection, download_report, health_check,
    last_result, update_profile,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Multipart framing on top of the largest accepted image
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/inspections", post(analyze))
        .route("/inspections/:id", delete(delete_inspection))
        .route("/inspections/:id/report", get(download_report))
        .route("/result", get(last_result))
        .route("/reports", post(create_report))
        .route("/profile", put(update_profile))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
