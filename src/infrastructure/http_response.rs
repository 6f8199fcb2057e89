// HTTP response utilities for report downloads
use crate::infrastructure::report_renderer::RenderedReport;
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};

/// Serve a rendered report as a file download
pub fn report_download_response(report: RenderedReport) -> Result<Response<Body>, StatusCode> {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        report.file_name.replace('"', "")
    ))
    .map_err(|e| {
        tracing::error!("Invalid report file name {:?}: {}", report.file_name, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, report.content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, report.bytes.len())
        .body(Body::from(report.bytes))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
