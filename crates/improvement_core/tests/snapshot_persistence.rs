use improvement_core::db::open_db_in_memory;
use improvement_core::{
    Improvement, ImprovementState, Metric, MetricState, PersistenceError, Snapshot,
    SnapshotPersistence, SqliteSnapshotStore,
};
use rusqlite::params;

fn sample_state() -> ImprovementState {
    let mut state = ImprovementState::initial();
    let mut improvement = Improvement::new("abc123", "Floss");
    improvement.is_repeat = true;
    improvement.checked_days = vec!["2024-02-01".to_string(), "2024-02-03".to_string()];
    state.insert(improvement);
    state.insert(Improvement::new("def456", "Journal"));
    state.hidden_improvement_banner_items = vec!["def456".to_string()];
    state.hide_day = Some("2024-02-03".to_string());
    state
}

#[test]
fn load_returns_none_for_unknown_project() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSnapshotStore::new(&conn);

    let loaded: Option<ImprovementState> = store.load("nobody").unwrap();

    assert!(loaded.is_none());
}

#[test]
fn saved_snapshot_is_loaded_back_per_project() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSnapshotStore::new(&conn);
    let state = sample_state();

    store.save("project-a", &state).unwrap();

    let loaded: Option<ImprovementState> = store.load("project-a").unwrap();
    assert_eq!(loaded, Some(state));
    let other: Option<ImprovementState> = store.load("project-b").unwrap();
    assert!(other.is_none());
}

#[test]
fn save_replaces_previous_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSnapshotStore::new(&conn);
    store.save("project-a", &sample_state()).unwrap();

    store.save("project-a", &ImprovementState::initial()).unwrap();

    let loaded: Option<ImprovementState> = store.load("project-a").unwrap();
    assert_eq!(loaded, Some(ImprovementState::initial()));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM project_snapshots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn improvement_and_metric_snapshots_are_stored_separately() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSnapshotStore::new(&conn);
    let mut metrics = MetricState::initial();
    metrics.upsert(Metric::for_day("2024-02-03"));

    store.save("project-a", &sample_state()).unwrap();
    store.save("project-a", &metrics).unwrap();

    let loaded: Option<MetricState> = store.load("project-a").unwrap();
    assert_eq!(loaded, Some(metrics));
    assert_eq!(
        store.list_projects(<ImprovementState as Snapshot>::FEATURE).unwrap(),
        vec!["project-a".to_string()]
    );
    assert!(store.delete("project-a", "metric").unwrap());
    let gone: Option<MetricState> = store.load("project-a").unwrap();
    assert!(gone.is_none());
}

#[test]
fn snapshot_uses_camel_case_payload() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSnapshotStore::new(&conn);
    store.save("project-a", &sample_state()).unwrap();

    let payload: String = conn
        .query_row(
            "SELECT payload FROM project_snapshots WHERE project_id = ?1 AND feature = ?2;",
            params!["project-a", "improvement"],
            |row| row.get(0),
        )
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(json["hideDay"], "2024-02-03");
    assert_eq!(json["entities"]["abc123"]["checkedDays"][1], "2024-02-03");
}

#[test]
fn invalid_persisted_payload_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO project_snapshots (project_id, feature, payload) VALUES (?1, ?2, ?3);",
        params![
            "project-a",
            "improvement",
            r#"{"ids":["x"],"entities":{"x":{"id":"x","title":"t","checkedDays":["01/02/2024"]}}}"#
        ],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO project_snapshots (project_id, feature, payload) VALUES (?1, ?2, ?3);",
        params!["project-b", "improvement", "not json"],
    )
    .unwrap();
    let store = SqliteSnapshotStore::new(&conn);

    let bad_day = SnapshotPersistence::<ImprovementState>::load(&store, "project-a").unwrap_err();
    let bad_json = SnapshotPersistence::<ImprovementState>::load(&store, "project-b").unwrap_err();

    assert!(matches!(bad_day, PersistenceError::InvalidData { .. }));
    assert!(matches!(bad_json, PersistenceError::InvalidData { .. }));
}

#[test]
fn payload_with_missing_optional_fields_loads_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO project_snapshots (project_id, feature, payload) VALUES (?1, ?2, ?3);",
        params![
            "project-a",
            "improvement",
            r#"{"ids":["x"],"entities":{"x":{"id":"x","title":"t"}}}"#
        ],
    )
    .unwrap();
    let store = SqliteSnapshotStore::new(&conn);

    let loaded: ImprovementState = store.load("project-a").unwrap().unwrap();

    let improvement = loaded.get("x").unwrap();
    assert!(!improvement.is_repeat);
    assert!(improvement.checked_days.is_empty());
    assert!(loaded.hidden_improvement_banner_items.is_empty());
    assert_eq!(loaded.hide_day, None);
}
