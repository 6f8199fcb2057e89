// Profile service - Use case for editing the signed-in user's details
use crate::application::inspection_gateway::{GatewayError, InspectionGateway};
use crate::domain::profile::{ProfileUpdate, UserProfile};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("No fields to update")]
    NothingToUpdate,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Clone)]
pub struct ProfileService {
    gateway: Arc<dyn InspectionGateway>,
}

impl ProfileService {
    pub fn new(gateway: Arc<dyn InspectionGateway>) -> Self {
        Self { gateway }
    }

    pub async fn update(&self, update: ProfileUpdate) -> Result<UserProfile, ProfileError> {
        let update = ProfileUpdate {
            name: update.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            email: update.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
        };
        if update.is_empty() {
            return Err(ProfileError::NothingToUpdate);
        }

        Ok(self.gateway.update_profile(&update).await?)
    }
}
