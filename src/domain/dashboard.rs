// Dashboard domain model
use super::inspection::{InspectionId, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of history entries listed on the dashboard.
pub const RECENT_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    #[serde(rename = "Good")]
    pub good: usize,
    #[serde(rename = "Moderate")]
    pub moderate: usize,
    #[serde(rename = "Critical")]
    pub critical: usize,
}

impl SeverityCounts {
    pub fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::Good => self.good += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::Critical => self.critical += 1,
        }
    }
}

/// Summary of a user's inspection history. Always derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStatistics {
    pub total_inspections: usize,
    pub average_score: u8,
    pub severity_counts: SeverityCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: InspectionId,
    pub created_at: DateTime<Utc>,
    pub severity: Severity,
    pub health_score: u8,
    pub damage_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub statistics: Option<DashboardStatistics>,
    pub history: Vec<HistoryEntry>,
}

impl Dashboard {
    pub fn new(statistics: Option<DashboardStatistics>, history: Vec<HistoryEntry>) -> Self {
        Self {
            statistics,
            history,
        }
    }
}
