// HTTP gateway to the inspection backend
use crate::application::inspection_gateway::{GatewayError, InspectionGateway};
use crate::application::scoring::ScoringEngine;
use crate::application::upload::ImageUpload;
use crate::domain::inspection::{InspectionId, InspectionRecord};
use crate::domain::profile::{ProfileUpdate, UserProfile};
use crate::infrastructure::record_mapper::{
    profile_from_dto, record_from_analysis, record_from_dto, AnalyzeResponse, ErrorBody,
    HistoryResponse, ProfileResponse,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpInspectionGateway {
    base_url: String,
    token: Option<String>,
    client: Client,
    scoring: ScoringEngine,
}

impl HttpInspectionGateway {
    pub fn new(
        base_url: String,
        token: Option<String>,
        timeout: Duration,
        scoring: ScoringEngine,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            client,
            scoring,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, GatewayError> {
        let token = self.token.as_deref().ok_or(GatewayError::Unauthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Inspection backend responded {}", status);
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => Err(GatewayError::Unauthenticated),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound("Inspection".to_string())),
            _ => {
                let message = serde_json::from_str::<ErrorBody>(&body)
                    .map(|b| b.error)
                    .unwrap_or(body);
                Err(GatewayError::Backend {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl InspectionGateway for HttpInspectionGateway {
    async fn submit(&self, image: &ImageUpload) -> Result<InspectionRecord, GatewayError> {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.filename.clone())
            .mime_str(&image.media_type)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let form = Form::new().part("image", part);

        tracing::debug!("Submitting {} ({} bytes)", image.filename, image.bytes.len());
        let request = self.authorized(self.client.post(self.url("/api/analyze")))?;
        let response = self.send(request.multipart(form)).await?;
        let analysis = Self::json::<AnalyzeResponse>(response).await?;

        record_from_analysis(analysis, Utc::now(), &self.scoring)
    }

    async fn list_history(&self) -> Result<Vec<InspectionRecord>, GatewayError> {
        let request = self.authorized(self.client.get(self.url("/api/inspections")))?;
        let response = self.send(request).await?;
        let history = Self::json::<HistoryResponse>(response).await?;

        Ok(history
            .inspections
            .into_iter()
            .map(|dto| record_from_dto(dto, &self.scoring))
            .collect())
    }

    async fn delete_record(&self, id: &InspectionId) -> Result<(), GatewayError> {
        let path = format!("/api/inspections/{}", urlencoding::encode(id.as_str()));
        let request = self.authorized(self.client.delete(self.url(&path)))?;
        self.send(request).await?;
        Ok(())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, GatewayError> {
        let request = self.authorized(self.client.put(self.url("/api/profile")))?;
        let response = self.send(request.json(update)).await?;
        let profile = Self::json::<ProfileResponse>(response).await?;

        Ok(profile_from_dto(profile.user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inspection::Severity;
    use axum::extract::{Multipart, State};
    use axum::http::{header, HeaderMap, StatusCode as AxumStatus, Uri};
    use axum::routing::{delete, get, post, put};
    use axum::{Json, Router};
    use bytes::Bytes;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    const TOKEN: &str = "session-token";

    /// Serves `router` on an ephemeral port and returns its base url.
    async fn backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn signed_in(router: Router) -> HttpInspectionGateway {
        HttpInspectionGateway::new(
            backend(router).await,
            Some(TOKEN.to_string()),
            Duration::from_secs(5),
            ScoringEngine::default(),
        )
        .unwrap()
    }

    fn failing_history(status: AxumStatus, body: &'static str) -> Router {
        Router::new().route("/api/inspections", get(move || async move { (status, body) }))
    }

    fn bearer(headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    fn gateway(token: Option<&str>) -> HttpInspectionGateway {
        HttpInspectionGateway::new(
            "http://localhost:5000/".to_string(),
            token.map(str::to_string),
            Duration::from_secs(5),
            ScoringEngine::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        assert_eq!(
            gateway(None).url("/api/inspections"),
            "http://localhost:5000/api/inspections"
        );
    }

    #[tokio::test]
    async fn test_signed_out_history_makes_no_request() {
        let result = gateway(None).list_history().await;
        assert!(matches!(result, Err(GatewayError::Unauthenticated)));

        let blank = gateway(Some("  ")).list_history().await;
        assert!(matches!(blank, Err(GatewayError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthenticated() {
        let gateway = signed_in(failing_history(AxumStatus::UNAUTHORIZED, r#"{"error": "Token expired"}"#)).await;
        assert!(matches!(gateway.list_history().await, Err(GatewayError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let gateway = signed_in(failing_history(AxumStatus::NOT_FOUND, r#"{"error": "Inspection not found"}"#)).await;
        assert!(matches!(gateway.list_history().await, Err(GatewayError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_backend_error_carries_json_message() {
        let gateway = signed_in(failing_history(
            AxumStatus::INTERNAL_SERVER_ERROR,
            r#"{"error": "Database unavailable"}"#,
        ))
        .await;

        match gateway.list_history().await {
            Err(GatewayError::Backend { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Database unavailable");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_backend_error_falls_back_to_raw_body() {
        let gateway = signed_in(failing_history(AxumStatus::SERVICE_UNAVAILABLE, "down for maintenance")).await;

        match gateway.list_history().await {
            Err(GatewayError::Backend { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "down for maintenance");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_history_envelope_is_unwrapped() {
        let router = Router::new().route(
            "/api/inspections",
            get(|headers: HeaderMap| async move {
                if bearer(&headers).as_deref() != Some("Bearer session-token") {
                    return (AxumStatus::UNAUTHORIZED, Json(json!({"error": "No token"})));
                }
                (
                    AxumStatus::OK,
                    Json(json!({
                        "inspections": [
                            {
                                "_id": "665f0c",
                                "created_at": "2026-03-01T10:15:30Z",
                                "detected_damages": {"spalling": 1},
                                "severity": "Moderate",
                                "health_score": 80,
                                "precautions": ["Repair spalled concrete"]
                            },
                            {
                                "_id": "665f0d",
                                "detected_damages": {"stain": 1, "peeling": 2}
                            }
                        ]
                    })),
                )
            }),
        );
        let gateway = signed_in(router).await;

        let records = gateway.list_history().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_str(), "665f0c");
        assert_eq!(records[0].result.severity, Severity::Moderate);
        assert_eq!(records[0].result.health_score, 80);
        // 100 - 5 - 2*10, scored locally
        assert_eq!(records[1].result.health_score, 75);
        assert_eq!(records[1].result.severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_delete_encodes_record_id() {
        let seen = Arc::new(Mutex::new(None));
        let router = Router::new()
            .route(
                "/api/inspections/:id",
                delete(|State(seen): State<Arc<Mutex<Option<String>>>>, uri: Uri| async move {
                    *seen.lock().unwrap() = Some(uri.path().to_string());
                    Json(json!({"message": "Inspection deleted"}))
                }),
            )
            .with_state(seen.clone());
        let gateway = signed_in(router).await;

        gateway.delete_record(&InspectionId::new("2026 03/1")).await.unwrap();

        assert_eq!(
            seen.lock().unwrap().as_deref(),
            Some("/api/inspections/2026%2003%2F1")
        );
    }

    #[tokio::test]
    async fn test_profile_envelope_is_unwrapped() {
        let router = Router::new().route(
            "/api/profile",
            put(|Json(update): Json<Value>| async move {
                Json(json!({
                    "message": "Profile updated",
                    "user": {"_id": "u1", "name": update["name"], "email": "ana@example.org"}
                }))
            }),
        );
        let gateway = signed_in(router).await;

        let update = ProfileUpdate {
            name: Some("Ana".to_string()),
            email: None,
        };
        let profile = gateway.update_profile(&update).await.unwrap();

        assert_eq!(profile.id, "u1");
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.email, "ana@example.org");
    }

    #[tokio::test]
    async fn test_submit_sends_image_field() {
        let fields = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route(
                "/api/analyze",
                post(|State(fields): State<Arc<Mutex<Vec<String>>>>, mut multipart: Multipart| async move {
                    while let Ok(Some(field)) = multipart.next_field().await {
                        let name = field.name().unwrap_or_default().to_string();
                        fields.lock().unwrap().push(name);
                    }
                    Json(json!({
                        "inspection_id": "66a001",
                        "detected_damages": {"minor_crack": 1},
                        "severity": "Moderate",
                        "health_score": 92,
                        "precautions": ["Monitor cracks and apply sealant if needed."]
                    }))
                }),
            )
            .with_state(fields.clone());
        let gateway = signed_in(router).await;

        let image = ImageUpload::new("wall.png", "image/png", Bytes::from_static(b"\x89PNG"));
        let record = gateway.submit(&image).await.unwrap();

        assert_eq!(record.id.as_str(), "66a001");
        assert_eq!(record.result.health_score, 92);
        assert_eq!(fields.lock().unwrap().as_slice(), ["image".to_string()]);
    }
}
