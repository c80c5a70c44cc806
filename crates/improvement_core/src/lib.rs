//! Core logic for improvement tracking.
//! This crate owns the improvement state, its commands and derived views.

pub mod config;
pub mod db;
pub mod id;
pub mod logging;
pub mod markup;
pub mod model;
pub mod persistence;
pub mod service;
pub mod store;
pub mod worklog;

pub use config::{ConfigError, CoreConfig};
pub use id::{IdGenerator, ShortIdGenerator};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use markup::jira::to_markdown;
pub use markup::JiraToMarkdown;
pub use model::improvement::{
    Improvement, ImprovementChanges, ImprovementId, ImprovementState, ImprovementValidationError,
};
pub use model::metric::{Metric, MetricState};
pub use persistence::{
    PersistenceError, PersistenceResult, Snapshot, SnapshotPersistence, SqliteSnapshotStore,
};
pub use service::improvement_service::ImprovementService;
pub use service::metric_service::MetricService;
pub use store::action::{Action, ImprovementAction, MetricAction};
pub use store::{AppState, Selection, Store};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
