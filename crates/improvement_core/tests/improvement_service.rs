use improvement_core::db::{open_db_in_memory, DbError};
use improvement_core::worklog::today_str;
use improvement_core::{
    IdGenerator, Improvement, ImprovementChanges, ImprovementId, ImprovementService,
    ImprovementState, Metric, MetricService, PersistenceError, PersistenceResult,
    SnapshotPersistence, SqliteSnapshotStore, Store,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct MemoryPersistence {
    saved: RefCell<HashMap<String, ImprovementState>>,
    fail_loads: bool,
}

impl SnapshotPersistence<ImprovementState> for MemoryPersistence {
    fn load(&self, project_id: &str) -> PersistenceResult<Option<ImprovementState>> {
        if self.fail_loads {
            return Err(PersistenceError::Db(DbError::Sqlite(
                rusqlite::Error::InvalidQuery,
            )));
        }
        Ok(self.saved.borrow().get(project_id).cloned())
    }

    fn save(&self, project_id: &str, state: &ImprovementState) -> PersistenceResult<()> {
        self.saved
            .borrow_mut()
            .insert(project_id.to_string(), state.clone());
        Ok(())
    }
}

#[derive(Default)]
struct SequenceIds {
    next: Cell<u32>,
}

impl IdGenerator for SequenceIds {
    fn generate(&self) -> ImprovementId {
        let value = self.next.get();
        self.next.set(value + 1);
        format!("id-{value}")
    }
}

fn service() -> ImprovementService<MemoryPersistence, SequenceIds> {
    ImprovementService::with_id_generator(
        Arc::new(Store::default()),
        MemoryPersistence::default(),
        SequenceIds::default(),
    )
}

fn current(service: &ImprovementService<MemoryPersistence, SequenceIds>) -> ImprovementState {
    service.store().snapshot().improvement
}

#[test]
fn add_improvement_returns_id_of_created_record() {
    let service = service();
    let mut view = service.improvements();
    assert_eq!(view.try_recv(), Some(Vec::new()));

    let id = service.add_improvement("Meditate");

    assert_eq!(id, "id-0");
    let created = view.try_recv().unwrap();
    assert_eq!(
        created,
        vec![Improvement {
            id: id.clone(),
            title: "Meditate".to_string(),
            is_repeat: false,
            checked_days: Vec::new(),
        }]
    );
}

#[test]
fn default_generator_produces_distinct_ids() {
    let service = ImprovementService::new(Arc::new(Store::default()), MemoryPersistence::default());
    let first = service.add_improvement("one");
    let second = service.add_improvement("two");
    assert_ne!(first, second);
    assert_eq!(service.store().snapshot().improvement.len(), 2);
}

#[test]
fn add_checked_day_defaults_to_today() {
    let service = service();
    let id = service.add_improvement("Read");

    service.add_checked_day(&id, None);
    service.add_checked_day(&id, Some("2023-12-31"));

    let state = current(&service);
    assert_eq!(
        state.get(&id).unwrap().checked_days,
        vec![today_str(), "2023-12-31".to_string()]
    );
}

#[test]
fn load_state_for_project_without_snapshot_installs_initial_state() {
    let service = service();
    service.add_improvement("stale");

    service.load_state_for_project("project-a").unwrap();

    assert_eq!(current(&service), ImprovementState::initial());
}

#[test]
fn load_state_for_project_installs_saved_snapshot() {
    let service = service();
    let id = service.add_improvement("Walk");
    service.save_state_for_project("project-a").unwrap();
    service.delete_improvement(&id);
    assert!(current(&service).is_empty());

    service.load_state_for_project("project-a").unwrap();

    assert_eq!(current(&service).get(&id).unwrap().title, "Walk");
}

#[test]
fn load_failure_propagates_and_keeps_state() {
    let service = ImprovementService::with_id_generator(
        Arc::new(Store::default()),
        MemoryPersistence {
            fail_loads: true,
            ..MemoryPersistence::default()
        },
        SequenceIds::default(),
    );
    let id = service.add_improvement("kept");

    let err = service.load_state_for_project("project-a").unwrap_err();

    assert!(matches!(err, PersistenceError::Db(_)));
    assert!(service.store().snapshot().improvement.contains(&id));
}

#[test]
fn delete_improvements_matches_sequential_deletes() {
    let batched = service();
    let sequential = service();
    for target in [&batched, &sequential] {
        for title in ["a", "b", "c"] {
            target.add_improvement(title);
        }
    }

    batched.delete_improvements(&["id-0".to_string(), "id-1".to_string()]);
    sequential.delete_improvement("id-0");
    sequential.delete_improvement("id-1");

    assert_eq!(current(&batched), current(&sequential));
    assert_eq!(current(&batched).ids, vec!["id-2".to_string()]);
}

#[test]
fn update_applies_partial_changes_only() {
    let service = service();
    let id = service.add_improvement("Old title");
    service.add_checked_day(&id, Some("2024-01-01"));

    service.update_improvement(&id, ImprovementChanges::title("New title"));

    let improvement = current(&service).get(&id).cloned().unwrap();
    assert_eq!(improvement.title, "New title");
    assert_eq!(improvement.checked_days, vec!["2024-01-01".to_string()]);
    assert!(!improvement.is_repeat);
}

#[test]
fn unknown_ids_are_silently_ignored() {
    let service = service();
    service.add_improvement("only");
    let before = current(&service);

    service.update_improvement("missing", ImprovementChanges::title("x"));
    service.add_checked_day("missing", None);
    service.toggle_improvement_repeat("missing");
    service.delete_improvement("missing");

    assert_eq!(current(&service), before);
}

#[test]
fn repeat_views_follow_toggle_and_disable() {
    let service = service();
    let first = service.add_improvement("first");
    let second = service.add_improvement("second");
    let mut repeated = service.repeated_improvement_ids();

    service.toggle_improvement_repeat(&second);
    service.toggle_improvement_repeat(&first);
    service.disable_improvement_repeat(&second);

    assert_eq!(
        repeated.pending(),
        vec![
            Vec::new(),
            vec![second.clone()],
            vec![first.clone(), second.clone()],
            vec![first.clone()],
        ]
    );
}

#[test]
fn banner_views_use_last_tracked_metric_and_hidden_ids() {
    let store = Arc::new(Store::default());
    let improvements = ImprovementService::with_id_generator(
        Arc::clone(&store),
        MemoryPersistence::default(),
        SequenceIds::default(),
    );
    let conn = open_db_in_memory().unwrap();
    let metrics = MetricService::new(Arc::clone(&store), SqliteSnapshotStore::new(&conn));

    let picked = improvements.add_improvement("picked");
    let repeating = improvements.add_improvement("repeating");
    improvements.toggle_improvement_repeat(&repeating);

    let mut has_banner = improvements.has_last_tracked_improvements();
    let mut banner = improvements.improvement_banner_improvements();
    assert_eq!(has_banner.latest(), Some(false));

    let mut metric = Metric::for_day("2024-06-01");
    metric.improvements_tomorrow = vec![picked.clone()];
    metrics.upsert_metric(metric);

    let titles = |list: Vec<Improvement>| {
        list.into_iter()
            .map(|improvement| improvement.title)
            .collect::<Vec<_>>()
    };
    assert_eq!(titles(banner.latest().unwrap()), vec!["picked", "repeating"]);
    assert_eq!(has_banner.latest(), Some(true));

    improvements.hide_improvement(&picked);
    improvements.hide_improvement(&repeating);
    assert!(banner.latest().unwrap().is_empty());
    assert_eq!(has_banner.latest(), Some(false));

    improvements.clear_hidden_improvements();
    assert_eq!(titles(banner.latest().unwrap()), vec!["picked", "repeating"]);
    assert_eq!(store.snapshot().improvement.len(), 2);
}

#[test]
fn clear_hidden_if_new_day_only_clears_stale_hides() {
    let service = service();
    let id = service.add_improvement("hide me");
    service.hide_improvement(&id);

    assert!(!service.clear_hidden_if_new_day(&today_str()));
    assert!(current(&service).is_hidden(&id));

    assert!(service.clear_hidden_if_new_day("2000-01-01"));
    assert!(!current(&service).is_hidden(&id));
    assert!(current(&service).contains(&id));
}

#[test]
fn malformed_days_never_reach_a_saved_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let store = Arc::new(Store::default());
    let improvements = ImprovementService::with_id_generator(
        Arc::clone(&store),
        SqliteSnapshotStore::new(&conn),
        SequenceIds::default(),
    );
    let metrics = MetricService::new(Arc::clone(&store), SqliteSnapshotStore::new(&conn));

    let id = improvements.add_improvement("Stretch");
    improvements.add_checked_day(&id, Some("tomorrow"));
    improvements.add_checked_day(&id, Some("2024-06-01"));
    improvements.update_improvement(
        &id,
        ImprovementChanges {
            checked_days: Some(vec!["someday".to_string()]),
            ..ImprovementChanges::default()
        },
    );
    metrics.upsert_metric(Metric::for_day("today"));
    metrics.upsert_metric(Metric::for_day("2024-06-01"));

    improvements.save_state_for_project("project-a").unwrap();
    metrics.save_state_for_project("project-a").unwrap();

    let reloaded = Arc::new(Store::default());
    let improvements = ImprovementService::new(Arc::clone(&reloaded), SqliteSnapshotStore::new(&conn));
    let metrics = MetricService::new(Arc::clone(&reloaded), SqliteSnapshotStore::new(&conn));
    improvements.load_state_for_project("project-a").unwrap();
    metrics.load_state_for_project("project-a").unwrap();

    let state = reloaded.snapshot();
    assert_eq!(
        state.improvement.get(&id).unwrap().checked_days,
        vec!["2024-06-01".to_string()]
    );
    assert_eq!(state.metric.ids, vec!["2024-06-01".to_string()]);
}
