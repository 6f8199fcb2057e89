// Error responses for the browser UI
use crate::application::inspection_gateway::GatewayError;
use crate::application::profile_service::ProfileError;
use crate::application::upload::UploadRejection;
use crate::infrastructure::report_renderer::ReportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upload(#[from] UploadRejection),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("Failed to generate report: {0}")]
    Report(#[from] ReportError),
    #[error("malformed upload: {0}")]
    Multipart(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Upload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Gateway(err) | ApiError::Profile(ProfileError::Gateway(err)) => {
                gateway_status(err)
            }
            ApiError::Profile(ProfileError::NothingToUpdate) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Report(ReportError::InvalidScore(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Report(ReportError::Layout(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
        }
    }
}

fn gateway_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::Unauthenticated => StatusCode::UNAUTHORIZED,
        GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        GatewayError::Transport(_) | GatewayError::Backend { .. } | GatewayError::Decode(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = Json(json!({ "error": self.to_string(), "dismissible": true }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let too_large = ApiError::from(UploadRejection::TooLarge { size: 11 << 20 });
        assert_eq!(too_large.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(too_large.to_string(), "Image size should be less than 10MB");

        let offline = ApiError::from(GatewayError::Transport("refused".to_string()));
        assert_eq!(offline.status(), StatusCode::BAD_GATEWAY);

        let signed_out = ApiError::from(ProfileError::Gateway(GatewayError::Unauthenticated));
        assert_eq!(signed_out.status(), StatusCode::UNAUTHORIZED);

        let missing = ApiError::from(GatewayError::NotFound("Inspection".to_string()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
