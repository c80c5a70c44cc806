//! Daily metric use-case service.
//!
//! Metrics are the data source of the improvement banner: the last tracked
//! day decides which improvements are suggested.

use crate::model::metric::{Metric, MetricState};
use crate::persistence::{PersistenceResult, SnapshotPersistence};
use crate::store::action::MetricAction;
use crate::store::selectors::select_last_tracked_metric;
use crate::store::{Selection, Store};
use std::sync::Arc;

pub struct MetricService<P> {
    store: Arc<Store>,
    persistence: P,
}

impl<P: SnapshotPersistence<MetricState>> MetricService<P> {
    pub fn new(store: Arc<Store>, persistence: P) -> Self {
        Self { store, persistence }
    }

    /// Loads the project's metrics, or an empty state when none were saved.
    pub fn load_state_for_project(&self, project_id: &str) -> PersistenceResult<()> {
        let saved = SnapshotPersistence::<MetricState>::load(&self.persistence, project_id)?;
        self.load_state(saved.unwrap_or_else(MetricState::initial));
        Ok(())
    }

    pub fn save_state_for_project(&self, project_id: &str) -> PersistenceResult<()> {
        let state = self.store.with_state(|state| state.metric.clone());
        self.persistence.save(project_id, &state)
    }

    pub fn load_state(&self, state: MetricState) {
        self.store.dispatch(MetricAction::LoadMetricState { state });
    }

    pub fn upsert_metric(&self, metric: Metric) {
        self.store.dispatch(MetricAction::UpsertMetric { metric });
    }

    pub fn delete_metric(&self, day: &str) {
        self.store
            .dispatch(MetricAction::DeleteMetric { id: day.to_string() });
    }

    pub fn last_tracked_metric(&self) -> Selection<Option<Metric>> {
        self.store.select(select_last_tracked_metric)
    }
}
