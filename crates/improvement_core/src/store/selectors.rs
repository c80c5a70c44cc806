//! Derived views over `AppState`.

use crate::model::improvement::{Improvement, ImprovementId};
use crate::model::metric::Metric;
use crate::store::AppState;

pub fn select_all_improvements(state: &AppState) -> Vec<Improvement> {
    state.improvement.all()
}

pub fn select_repeated_improvement_ids(state: &AppState) -> Vec<ImprovementId> {
    state
        .improvement
        .all()
        .into_iter()
        .filter(|improvement| improvement.is_repeat)
        .map(|improvement| improvement.id)
        .collect()
}

pub fn select_last_tracked_metric(state: &AppState) -> Option<Metric> {
    state.metric.last_tracked().cloned()
}

/// Improvements suggested in the daily banner.
///
/// Empty until a metric has been tracked. Otherwise the last metric's
/// `improvements_tomorrow` followed by repeating improvements, without
/// duplicates, hidden ids or ids that no longer exist.
pub fn select_improvement_banner_improvements(state: &AppState) -> Vec<Improvement> {
    let Some(metric) = state.metric.last_tracked() else {
        return Vec::new();
    };

    let improvement_state = &state.improvement;
    let repeated = select_repeated_improvement_ids(state);
    let mut seen: Vec<&str> = Vec::new();
    let mut banner = Vec::new();

    for id in metric.improvements_tomorrow.iter().chain(repeated.iter()) {
        if seen.contains(&id.as_str()) {
            continue;
        }
        seen.push(id.as_str());
        if improvement_state.is_hidden(id) {
            continue;
        }
        if let Some(improvement) = improvement_state.get(id) {
            banner.push(improvement.clone());
        }
    }

    banner
}

pub fn select_has_last_tracked_improvements(state: &AppState) -> bool {
    !select_improvement_banner_improvements(state).is_empty()
}
