// HTTP request handlers
use crate::application::classification::classify;
use crate::application::report::{ReportDocument, ReportMeta};
use crate::application::upload::{ImageUpload, UploadRejection, MAX_UPLOAD_BYTES};
use crate::domain::inspection::{AnalysisOutcome, InspectionId, InspectionResult};
use crate::domain::profile::ProfileUpdate;
use crate::infrastructure::http_response::report_download_response;
use crate::infrastructure::report_renderer::render_report;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub(crate) const DEMO_NOTICE: &str = "Using demo data (Backend not connected)";
const SAFE_VIEW: &str = "/dashboard";

#[derive(Serialize)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    pub damage_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

#[derive(Deserialize)]
pub struct ReportRequest {
    pub result: InspectionResult,
    #[serde(default)]
    pub meta: ReportMeta,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Analyse an uploaded photo (multipart field `image`)
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, &headers))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let media_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, &headers))?;
        upload = Some(ImageUpload::new(filename, media_type, bytes));
    }
    let upload = upload.ok_or(UploadRejection::Missing)?;

    let outcome = state.inspection_service.analyze(&upload).await?;
    state.dashboard_service.record_analysis(outcome.clone()).await;

    Ok(Json(AnalysisResponse {
        damage_type: classify(&outcome.result().damages).label(),
        notice: outcome.is_demo().then_some(DEMO_NOTICE),
        filename: Some(upload.filename),
        outcome,
    }))
}

/// Statistics and recent history, reloaded from the backend
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let dashboard = state.dashboard_service.refresh().await?;
    Ok(Json(dashboard))
}

pub async fn delete_inspection(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = state.dashboard_service.delete(&InspectionId::new(id)).await?;
    Ok(Json(dashboard))
}

/// The most recent analysis; without one there is nothing to show
pub async fn last_result(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.last_outcome().await {
        Some(outcome) => Json(outcome).into_response(),
        None => Redirect::to(SAFE_VIEW).into_response(),
    }
}

/// Download the report for a cached inspection
pub async fn download_report(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let id = InspectionId::new(id);
    let Some(result) = state.dashboard_service.find_result(&id).await else {
        tracing::warn!("No inspection {} in session, redirecting", id);
        return Ok(Redirect::to(SAFE_VIEW).into_response());
    };

    let meta = ReportMeta {
        inspection_id: Some(id.to_string()),
        filename: None,
    };
    render_download(&result, &meta)
}

/// Render a report for a result supplied by the UI
pub async fn create_report(Json(request): Json<ReportRequest>) -> Result<Response, ApiError> {
    render_download(&request.result, &request.meta)
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.profile_service.update(update).await?;
    Ok(Json(profile))
}

/// A body cut off by the size limit is an oversized image, not a malformed form.
fn multipart_error(err: MultipartError, headers: &HeaderMap) -> ApiError {
    if err.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::Multipart(err.to_string());
    }

    // The body was never read in full, so Content-Length is the best size known.
    let size = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(MAX_UPLOAD_BYTES + 1);
    UploadRejection::TooLarge { size }.into()
}

fn render_download(result: &InspectionResult, meta: &ReportMeta) -> Result<Response, ApiError> {
    let document = ReportDocument::build(result, meta, Utc::now());
    let report = render_report(&document)?;
    tracing::info!("Rendered report {}", report.file_name);

    Ok(match report_download_response(report) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    })
}
