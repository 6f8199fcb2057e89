// Dashboard service - Session-owned history cache and derived statistics
use crate::application::aggregation::aggregate;
use crate::application::classification::classify;
use crate::application::inspection_gateway::{GatewayError, InspectionGateway};
use crate::domain::dashboard::{Dashboard, DashboardStatistics, HistoryEntry, RECENT_HISTORY_LIMIT};
use crate::domain::inspection::{AnalysisOutcome, InspectionId, InspectionRecord, InspectionResult};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Locally cached view of the user's inspections.
///
/// Records are kept most-recent-first. Statistics are recomputed from the
/// full record list after every mutation and never patched in place.
#[derive(Debug, Default)]
pub struct DashboardSession {
    records: Vec<InspectionRecord>,
    statistics: Option<DashboardStatistics>,
    last_outcome: Option<AnalysisOutcome>,
}

impl DashboardSession {
    pub fn records(&self) -> &[InspectionRecord] {
        &self.records
    }

    pub fn statistics(&self) -> Option<&DashboardStatistics> {
        self.statistics.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&AnalysisOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn replace_records(&mut self, records: Vec<InspectionRecord>) {
        self.records = records;
        self.recompute();
    }

    pub fn record_created(&mut self, record: InspectionRecord) {
        self.records.retain(|r| r.id != record.id);
        self.records.insert(0, record);
        self.recompute();
    }

    pub fn remove_record(&mut self, id: &InspectionId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        let removed = self.records.len() != before;
        self.recompute();
        removed
    }

    pub fn set_last_outcome(&mut self, outcome: AnalysisOutcome) {
        if let Some(record) = outcome.to_record() {
            self.record_created(record);
        }
        self.last_outcome = Some(outcome);
    }

    pub fn find_result(&self, id: &InspectionId) -> Option<&InspectionResult> {
        self.records
            .iter()
            .find(|r| &r.id == id)
            .map(|r| &r.result)
            .or_else(|| {
                self.last_outcome
                    .as_ref()
                    .filter(|outcome| outcome.id() == id)
                    .map(AnalysisOutcome::result)
            })
    }

    pub fn recent_history(&self) -> Vec<HistoryEntry> {
        self.records()
            .iter()
            .take(RECENT_HISTORY_LIMIT)
            .map(|record| HistoryEntry {
                id: record.id.clone(),
                created_at: record.created_at,
                severity: record.result.severity,
                health_score: record.result.health_score,
                damage_type: classify(&record.result.damages).label(),
            })
            .collect()
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.statistics().cloned(), self.recent_history())
    }

    fn recompute(&mut self) {
        self.statistics = aggregate(&self.records);
    }
}

#[derive(Clone)]
pub struct DashboardService {
    gateway: Arc<dyn InspectionGateway>,
    session: Arc<Mutex<DashboardSession>>,
}

impl DashboardService {
    pub fn new(gateway: Arc<dyn InspectionGateway>) -> Self {
        Self {
            gateway,
            session: Arc::new(Mutex::new(DashboardSession::default())),
        }
    }

    /// Reload history from the backend. A signed-out user has an empty history.
    pub async fn refresh(&self) -> Result<Dashboard, GatewayError> {
        let mut session = self.session.lock().await;

        let records = match self.gateway.list_history().await {
            Ok(records) => records,
            Err(GatewayError::Unauthenticated) => {
                tracing::debug!("No signed-in user, showing empty history");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        tracing::debug!("Loaded {} inspections", records.len());
        session.replace_records(records);
        Ok(session.dashboard())
    }

    /// Delete on the backend first; the cached list changes only once the
    /// backend has confirmed. The session stays locked for the whole call.
    pub async fn delete(&self, id: &InspectionId) -> Result<Dashboard, GatewayError> {
        let mut session = self.session.lock().await;

        self.gateway.delete_record(id).await?;

        if !session.remove_record(id) {
            tracing::debug!("Deleted inspection {} was not cached locally", id);
        }
        tracing::info!("Deleted inspection {}", id);
        Ok(session.dashboard())
    }

    pub async fn record_analysis(&self, outcome: AnalysisOutcome) {
        self.session.lock().await.set_last_outcome(outcome);
    }

    pub async fn last_outcome(&self) -> Option<AnalysisOutcome> {
        self.session.lock().await.last_outcome().cloned()
    }

    pub async fn find_result(&self, id: &InspectionId) -> Option<InspectionResult> {
        self.session.lock().await.find_result(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::inspection_gateway::fake::FakeGateway;
    use crate::domain::damage::DamageObservation;
    use crate::domain::inspection::Severity;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, score: u8, severity: Severity, damages: DamageObservation) -> InspectionRecord {
        InspectionRecord {
            id: InspectionId::new(id),
            created_at: Utc.with_ymd_and_hms(2026, 2, 10, 8, 0, 0).unwrap(),
            result: InspectionResult {
                severity,
                health_score: score,
                damages,
                precautions: vec!["Regular inspection recommended".to_string()],
            },
        }
    }

    fn history() -> Vec<InspectionRecord> {
        vec![
            record("a", 90, Severity::Good, DamageObservation::new()),
            record("b", 70, Severity::Moderate, DamageObservation::new().with("peeling", 2)),
            record("c", 50, Severity::Critical, DamageObservation::new().with("spalling", 3)),
        ]
    }

    #[tokio::test]
    async fn test_refresh_derives_statistics() {
        let service = DashboardService::new(Arc::new(FakeGateway::with_records(history())));

        let dashboard = service.refresh().await.unwrap();
        let stats = dashboard.statistics.unwrap();

        assert_eq!(stats.total_inspections, 3);
        assert_eq!(stats.average_score, 70);
        assert_eq!(dashboard.history.len(), 3);
        assert_eq!(dashboard.history[0].damage_type, "No Damage");
        assert_eq!(dashboard.history[1].damage_type, "Surface Damage");
        assert_eq!(dashboard.history[2].damage_type, "Critical Damage");
    }

    #[tokio::test]
    async fn test_signed_out_user_has_no_statistics() {
        let gateway = FakeGateway {
            signed_out: true,
            ..FakeGateway::with_records(history())
        };
        let service = DashboardService::new(Arc::new(gateway));

        let dashboard = service.refresh().await.unwrap();
        assert!(dashboard.statistics.is_none());
        assert!(dashboard.history.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_cached_state() {
        let gateway = Arc::new(FakeGateway::with_records(history()));
        let service = DashboardService::new(gateway.clone());
        service.refresh().await.unwrap();

        let offline = DashboardService {
            gateway: Arc::new(FakeGateway {
                offline: true,
                ..FakeGateway::default()
            }),
            session: service.session.clone(),
        };
        assert!(matches!(offline.refresh().await, Err(GatewayError::Transport(_))));
        assert_eq!(service.session.lock().await.dashboard().statistics.unwrap().total_inspections, 3);
    }

    #[tokio::test]
    async fn test_delete_recomputes_after_confirmation() {
        let service = DashboardService::new(Arc::new(FakeGateway::with_records(history())));
        service.refresh().await.unwrap();

        let dashboard = service.delete(&InspectionId::new("c")).await.unwrap();
        let stats = dashboard.statistics.unwrap();

        assert_eq!(stats.total_inspections, 2);
        assert_eq!(stats.average_score, 80);
        assert_eq!(stats.severity_counts.critical, 0);
        assert_eq!(
            Some(stats),
            aggregate(&history()[..2])
        );
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_state_untouched() {
        let gateway = FakeGateway {
            fail_deletes: true,
            ..FakeGateway::with_records(history())
        };
        let service = DashboardService::new(Arc::new(gateway));
        let before = service.refresh().await.unwrap().statistics;

        let result = service.delete(&InspectionId::new("a")).await;

        assert!(matches!(result, Err(GatewayError::Backend { status: 500, .. })));
        assert_eq!(service.session.lock().await.dashboard().statistics, before);
        assert_eq!(service.session.lock().await.dashboard().history.len(), 3);
    }

    #[tokio::test]
    async fn test_deleting_last_record_clears_statistics() {
        let only = vec![record("a", 90, Severity::Good, DamageObservation::new())];
        let service = DashboardService::new(Arc::new(FakeGateway::with_records(only)));
        service.refresh().await.unwrap();

        let dashboard = service.delete(&InspectionId::new("a")).await.unwrap();
        assert!(dashboard.statistics.is_none());
    }

    #[test]
    fn test_live_outcome_is_cached_and_demo_is_not() {
        let mut session = DashboardSession::default();
        session.replace_records(history());

        let live = record("new", 64, Severity::Critical, DamageObservation::new().with("minor_crack", 3));
        session.set_last_outcome(AnalysisOutcome::Live {
            id: live.id.clone(),
            created_at: live.created_at,
            result: live.result.clone(),
        });
        assert_eq!(session.records()[0].id.as_str(), "new");
        assert_eq!(session.statistics().unwrap().total_inspections, 4);

        session.set_last_outcome(AnalysisOutcome::Demo {
            id: InspectionId::new("demo_1"),
            result: live.result.clone(),
        });
        assert_eq!(session.statistics().unwrap().total_inspections, 4);
        assert!(session.find_result(&InspectionId::new("demo_1")).is_some());
        assert!(session.find_result(&InspectionId::new("missing")).is_none());
    }

    #[test]
    fn test_history_lists_five_most_recent() {
        let mut session = DashboardSession::default();
        let records = (0..8)
            .map(|i| record(&format!("r{i}"), 80, Severity::Good, DamageObservation::new()))
            .collect();
        session.replace_records(records);

        let history = session.recent_history();
        assert_eq!(history.len(), RECENT_HISTORY_LIMIT);
        assert_eq!(history[0].id.as_str(), "r0");
        assert_eq!(session.statistics().unwrap().total_inspections, 8);
    }
}
