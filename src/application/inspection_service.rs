// Inspection service - Use case for analysing a photo
use crate::application::inspection_gateway::InspectionGateway;
use crate::application::scoring::ScoringEngine;
use crate::application::upload::{ImageUpload, UploadRejection};
use crate::domain::damage::DamageObservation;
use crate::domain::inspection::{AnalysisOutcome, InspectionId};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct InspectionService {
    gateway: Arc<dyn InspectionGateway>,
    scoring: ScoringEngine,
    demo_damages: DamageObservation,
}

impl InspectionService {
    pub fn new(
        gateway: Arc<dyn InspectionGateway>,
        scoring: ScoringEngine,
        demo_damages: DamageObservation,
    ) -> Self {
        Self {
            gateway,
            scoring,
            demo_damages,
        }
    }

    /// Validate and submit a photo. When the backend cannot produce a verdict
    /// the demo observation is scored locally and returned as a demo outcome.
    pub async fn analyze(&self, image: &ImageUpload) -> Result<AnalysisOutcome, UploadRejection> {
        if let Err(rejection) = image.validate() {
            match &rejection {
                UploadRejection::Missing => tracing::warn!("Rejected empty upload"),
                UploadRejection::UnsupportedMediaType { media_type } => {
                    tracing::warn!("Rejected {}: unsupported type {:?}", image.filename, media_type)
                }
                UploadRejection::TooLarge { size } => {
                    tracing::warn!("Rejected {}: {} bytes", image.filename, size)
                }
            }
            return Err(rejection);
        }

        match self.gateway.submit(image).await {
            Ok(record) => {
                tracing::info!(
                    "Inspection {} stored: {} ({})",
                    record.id,
                    record.result.severity,
                    record.result.health_score
                );
                Ok(AnalysisOutcome::Live {
                    id: record.id,
                    created_at: record.created_at,
                    result: record.result,
                })
            }
            Err(e) => {
                tracing::warn!("Analysis of {} failed, using demo data: {}", image.filename, e);
                Ok(AnalysisOutcome::Demo {
                    id: InspectionId::demo(Utc::now()),
                    result: self.scoring.score(&self.demo_damages),
                })
            }
        }
    }
}
