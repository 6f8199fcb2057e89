// Mapper from backend wire payloads to domain records
use crate::application::inspection_gateway::GatewayError;
use crate::application::scoring::ScoringEngine;
use crate::domain::damage::DamageObservation;
use crate::domain::inspection::{InspectionId, InspectionRecord, InspectionResult, Severity};
use crate::domain::profile::UserProfile;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct InspectionRecordDto {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub detected_damages: DamageObservation,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub health_score: Option<i64>,
    #[serde(default)]
    pub precautions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub inspections: Vec<InspectionRecordDto>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub inspection_id: Option<String>,
    #[serde(default)]
    pub detected_damages: DamageObservation,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub health_score: Option<i64>,
    #[serde(default)]
    pub precautions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileDto {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub user: ProfileDto,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn record_from_dto(dto: InspectionRecordDto, scoring: &ScoringEngine) -> InspectionRecord {
    let created_at = match dto.created_at.as_deref() {
        Some(raw) => parse_timestamp(raw).unwrap_or_else(|| {
            tracing::warn!("Inspection {} has unreadable created_at {:?}", dto.id, raw);
            DateTime::<Utc>::default()
        }),
        None => DateTime::<Utc>::default(),
    };

    InspectionRecord {
        id: InspectionId::new(dto.id),
        created_at,
        result: complete_result(
            dto.detected_damages,
            dto.severity.as_deref(),
            dto.health_score,
            dto.precautions,
            scoring,
        ),
    }
}

pub fn record_from_analysis(
    response: AnalyzeResponse,
    created_at: DateTime<Utc>,
    scoring: &ScoringEngine,
) -> Result<InspectionRecord, GatewayError> {
    let id = response
        .inspection_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GatewayError::Decode("analysis response has no inspection_id".to_string()))?;

    Ok(InspectionRecord {
        id: InspectionId::new(id),
        created_at,
        result: complete_result(
            response.detected_damages,
            response.severity.as_deref(),
            response.health_score,
            response.precautions,
            scoring,
        ),
    })
}

pub fn profile_from_dto(dto: ProfileDto) -> UserProfile {
    UserProfile {
        id: dto.id,
        name: dto.name,
        email: dto.email,
    }
}

/// Backend verdicts are trusted as-is; anything missing is filled in by
/// scoring the detections locally.
fn complete_result(
    damages: DamageObservation,
    severity: Option<&str>,
    health_score: Option<i64>,
    precautions: Option<Vec<String>>,
    scoring: &ScoringEngine,
) -> InspectionResult {
    let computed = scoring.score(&damages);

    InspectionResult {
        severity: severity.and_then(Severity::from_label).unwrap_or(computed.severity),
        health_score: health_score
            .map(|score| score.clamp(0, 100) as u8)
            .unwrap_or(computed.health_score),
        damages,
        precautions: precautions
            .filter(|p| !p.is_empty())
            .unwrap_or(computed.precautions),
    }
}

/// Accepts RFC 3339 as well as the naive ISO timestamps the backend writes.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
