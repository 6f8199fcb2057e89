// Domain layer - Inspection data model
pub mod damage;
pub mod dashboard;
pub mod inspection;
pub mod profile;
