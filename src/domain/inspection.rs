// Inspection domain models
use super::damage::DamageObservation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse verdict derived from the number of detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Good,
    Moderate,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Good, Severity::Moderate, Severity::Critical];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.label().eq_ignore_ascii_case(label.trim()))
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Critical => "Critical",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Good => "No critical damages detected. Building is in good condition.",
            Self::Moderate => "Some damages detected. Regular monitoring recommended.",
            Self::Critical => "Critical damages detected. Immediate attention required.",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionId(String);

impl InspectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn demo(at: DateTime<Utc>) -> Self {
        Self(format!("demo_{}", at.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InspectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Verdict for a single photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionResult {
    pub severity: Severity,
    pub health_score: u8,
    #[serde(rename = "detected_damages")]
    pub damages: DamageObservation,
    pub precautions: Vec<String>,
}

/// An inspection result persisted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: InspectionId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: InspectionResult,
}

/// Result of an analyze request, tagged with where the verdict came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Live {
        id: InspectionId,
        created_at: DateTime<Utc>,
        result: InspectionResult,
    },
    Demo {
        id: InspectionId,
        result: InspectionResult,
    },
}

impl AnalysisOutcome {
    pub fn id(&self) -> &InspectionId {
        match self {
            Self::Live { id, .. } | Self::Demo { id, .. } => id,
        }
    }

    pub fn result(&self) -> &InspectionResult {
        match self {
            Self::Live { result, .. } | Self::Demo { result, .. } => result,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo { .. })
    }

    /// The persisted record for a live outcome. Demo results are never stored.
    pub fn to_record(&self) -> Option<InspectionRecord> {
        match self {
            Self::Live {
                id,
                created_at,
                result,
            } => Some(InspectionRecord {
                id: id.clone(),
                created_at: *created_at,
                result: result.clone(),
            }),
            Self::Demo { .. } => None,
        }
    }
}
