// History aggregation - Dashboard statistics over inspection records
use crate::domain::dashboard::{DashboardStatistics, SeverityCounts};
use crate::domain::inspection::InspectionRecord;

/// Summarise a record sequence. An empty history has no statistics at all.
pub fn aggregate(records: &[InspectionRecord]) -> Option<DashboardStatistics> {
    if records.is_empty() {
        return None;
    }

    let total = records.len();
    let mut score_sum: u64 = 0;
    let mut severity_counts = SeverityCounts::default();

    for record in records {
        score_sum += u64::from(record.result.health_score);
        severity_counts.increment(record.result.severity);
    }

    Some(DashboardStatistics {
        total_inspections: total,
        average_score: round_half_up_mean(score_sum, total as u64),
        severity_counts,
    })
}

/// floor(sum / count + 1/2) without going through floating point.
fn round_half_up_mean(sum: u64, count: u64) -> u8 {
    ((2 * sum + count) / (2 * count)) as u8
}
