//! Improvement use-case facade.
//!
//! # Responsibility
//! - Translate use-case calls into store commands.
//! - Expose derived views of the improvement collection.
//! - Bridge project snapshots between persistence and the store.
//!
//! # Invariants
//! - The facade holds no state of its own besides its collaborators.
//! - Ids are generated here, synchronously, before the create command.
//! - Persistence failures are returned to the caller unchanged.

use crate::id::{IdGenerator, ShortIdGenerator};
use crate::model::improvement::{Improvement, ImprovementChanges, ImprovementId, ImprovementState};
use crate::persistence::{PersistenceResult, SnapshotPersistence};
use crate::store::action::ImprovementAction;
use crate::store::selectors::{
    select_all_improvements, select_has_last_tracked_improvements,
    select_improvement_banner_improvements, select_repeated_improvement_ids,
};
use crate::store::{Selection, Store};
use crate::worklog::today_str;
use log::info;
use std::sync::Arc;

pub struct ImprovementService<P, G = ShortIdGenerator> {
    store: Arc<Store>,
    persistence: P,
    ids: G,
}

impl<P: SnapshotPersistence<ImprovementState>> ImprovementService<P> {
    /// Creates a facade using the default short id generator.
    pub fn new(store: Arc<Store>, persistence: P) -> Self {
        Self::with_id_generator(store, persistence, ShortIdGenerator)
    }
}

impl<P, G> ImprovementService<P, G>
where
    P: SnapshotPersistence<ImprovementState>,
    G: IdGenerator,
{
    pub fn with_id_generator(store: Arc<Store>, persistence: P, ids: G) -> Self {
        Self {
            store,
            persistence,
            ids,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Loads the project's saved snapshot, or the initial state when none exists.
    ///
    /// # Errors
    /// - Any persistence failure; the store is left untouched in that case.
    pub fn load_state_for_project(&self, project_id: &str) -> PersistenceResult<()> {
        let saved = SnapshotPersistence::<ImprovementState>::load(&self.persistence, project_id)?;
        info!(
            "event=improvement_load module=service status=ok found={}",
            saved.is_some()
        );
        self.load_state(saved.unwrap_or_else(ImprovementState::initial));
        Ok(())
    }

    /// Persists the current improvement state for the project.
    pub fn save_state_for_project(&self, project_id: &str) -> PersistenceResult<()> {
        let state = self.store.with_state(|state| state.improvement.clone());
        self.persistence.save(project_id, &state)
    }

    /// Replaces the improvement state wholesale.
    pub fn load_state(&self, state: ImprovementState) {
        self.store
            .dispatch(ImprovementAction::LoadImprovementState { state });
    }

    /// Creates a non-repeating improvement and returns its new id.
    pub fn add_improvement(&self, title: impl Into<String>) -> ImprovementId {
        let id = self.ids.generate();
        self.store.dispatch(ImprovementAction::AddImprovement {
            improvement: Improvement::new(id.clone(), title),
        });
        id
    }

    /// Marks `id` as done on `checked_day`, defaulting to today.
    pub fn add_checked_day(&self, id: &str, checked_day: Option<&str>) {
        let checked_day = checked_day.map_or_else(today_str, str::to_string);
        self.store
            .dispatch(ImprovementAction::AddImprovementCheckedDay {
                id: id.to_string(),
                checked_day,
            });
    }

    pub fn delete_improvement(&self, id: &str) {
        self.store.dispatch(ImprovementAction::DeleteImprovement { id: id.to_string() });
    }

    pub fn delete_improvements(&self, ids: &[ImprovementId]) {
        self.store
            .dispatch(ImprovementAction::DeleteImprovements { ids: ids.to_vec() });
    }

    pub fn update_improvement(&self, id: &str, changes: ImprovementChanges) {
        self.store.dispatch(ImprovementAction::UpdateImprovement {
            id: id.to_string(),
            changes,
        });
    }

    /// Hides `id` from the banner for today.
    pub fn hide_improvement(&self, id: &str) {
        self.store.dispatch(ImprovementAction::HideImprovement {
            id: id.to_string(),
            day: today_str(),
        });
    }

    pub fn toggle_improvement_repeat(&self, id: &str) {
        self.store
            .dispatch(ImprovementAction::ToggleImprovementRepeat { id: id.to_string() });
    }

    pub fn disable_improvement_repeat(&self, id: &str) {
        self.store
            .dispatch(ImprovementAction::DisableImprovementRepeat { id: id.to_string() });
    }

    pub fn clear_hidden_improvements(&self) {
        self.store.dispatch(ImprovementAction::ClearHiddenImprovements);
    }

    /// Un-hides banner items hidden on a day other than `today`.
    ///
    /// Returns whether anything was cleared.
    pub fn clear_hidden_if_new_day(&self, today: &str) -> bool {
        let stale = self.store.with_state(|state| {
            let improvement = &state.improvement;
            !improvement.hidden_improvement_banner_items.is_empty()
                && improvement.hide_day.as_deref() != Some(today)
        });
        if stale {
            self.clear_hidden_improvements();
        }
        stale
    }

    pub fn improvements(&self) -> Selection<Vec<Improvement>> {
        self.store.select(select_all_improvements)
    }

    pub fn repeated_improvement_ids(&self) -> Selection<Vec<ImprovementId>> {
        self.store.select(select_repeated_improvement_ids)
    }

    pub fn improvement_banner_improvements(&self) -> Selection<Vec<Improvement>> {
        self.store.select(select_improvement_banner_improvements)
    }

    pub fn has_last_tracked_improvements(&self) -> Selection<bool> {
        self.store.select(select_has_last_tracked_improvements)
    }
}
