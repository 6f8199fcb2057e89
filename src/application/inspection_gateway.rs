// Gateway trait for the inspection backend
use crate::application::upload::ImageUpload;
use crate::domain::inspection::{InspectionId, InspectionRecord};
use crate::domain::profile::{ProfileUpdate, UserProfile};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("not signed in")]
    Unauthenticated,
    #[error("inspection backend unreachable: {0}")]
    Transport(String),
    #[error("inspection backend returned {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("unexpected response from inspection backend: {0}")]
    Decode(String),
    #[error("{0} not found")]
    NotFound(String),
}

#[async_trait]
pub trait InspectionGateway: Send + Sync {
    /// Upload a photo for classification; the backend stores the result
    async fn submit(&self, image: &ImageUpload) -> Result<InspectionRecord, GatewayError>;

    /// Inspection history for the signed-in user, most recent first
    async fn list_history(&self) -> Result<Vec<InspectionRecord>, GatewayError>;

    async fn delete_record(&self, id: &InspectionId) -> Result<(), GatewayError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, GatewayError>;
}
