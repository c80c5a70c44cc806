//! State-reducing functions applied by the store, one command at a time.
//!
//! # Invariants
//! - Commands targeting unknown ids leave state unchanged.
//! - A checked day is stored at most once per improvement.
//! - A hidden id appears at most once in the banner hidden list.
//! - Day strings that are not `YYYY-MM-DD` dates are never stored, so every
//!   committed state stays loadable from a snapshot.

use crate::model::improvement::ImprovementState;
use crate::model::metric::MetricState;
use crate::store::action::{Action, ImprovementAction, MetricAction};
use crate::store::AppState;
use crate::worklog::is_valid_day;
use log::debug;

/// Applies one command. Returns whether the state changed.
pub fn reduce(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::Improvement(action) => reduce_improvement(&mut state.improvement, action),
        Action::Metric(action) => reduce_metric(&mut state.metric, action),
    }
}

pub fn reduce_improvement(state: &mut ImprovementState, action: ImprovementAction) -> bool {
    match action {
        ImprovementAction::LoadImprovementState { state: loaded } => {
            *state = loaded;
            true
        }
        ImprovementAction::AddImprovement { improvement } => {
            if improvement.validate().is_err() {
                return skip_invalid("add_improvement", &improvement.id);
            }
            let id = improvement.id.clone();
            let inserted = state.insert(improvement);
            if !inserted {
                debug!("event=reduce module=store status=skipped action=add_improvement reason=duplicate_id id={id}");
            }
            inserted
        }
        ImprovementAction::UpdateImprovement { id, changes } => match state.get_mut(&id) {
            Some(_) if changes.is_empty() => false,
            Some(_)
                if changes
                    .checked_days
                    .as_ref()
                    .is_some_and(|days| !days.iter().all(|day| is_valid_day(day))) =>
            {
                skip_invalid("update_improvement", &id)
            }
            Some(improvement) => {
                let before = improvement.clone();
                improvement.apply(&changes);
                *improvement != before
            }
            None => skip_unknown("update_improvement", &id),
        },
        ImprovementAction::AddImprovementCheckedDay { id, checked_day } => {
            match state.get_mut(&id) {
                Some(_) if !is_valid_day(&checked_day) => {
                    skip_invalid("add_improvement_checked_day", &id)
                }
                Some(improvement) => {
                    if improvement.checked_days.contains(&checked_day) {
                        return false;
                    }
                    improvement.checked_days.push(checked_day);
                    true
                }
                None => skip_unknown("add_improvement_checked_day", &id),
            }
        }
        ImprovementAction::DeleteImprovement { id } => state.remove(&id).is_some(),
        ImprovementAction::DeleteImprovements { ids } => ids
            .iter()
            .fold(false, |changed, id| state.remove(id).is_some() || changed),
        ImprovementAction::HideImprovement { id, day } => {
            let day_changed = state.hide_day.as_deref() != Some(day.as_str());
            state.hide_day = Some(day);
            if state.is_hidden(&id) {
                return day_changed;
            }
            state.hidden_improvement_banner_items.push(id);
            true
        }
        ImprovementAction::ToggleImprovementRepeat { id } => match state.get_mut(&id) {
            Some(improvement) => {
                improvement.is_repeat = !improvement.is_repeat;
                true
            }
            None => skip_unknown("toggle_improvement_repeat", &id),
        },
        ImprovementAction::DisableImprovementRepeat { id } => match state.get_mut(&id) {
            Some(improvement) => {
                let changed = improvement.is_repeat;
                improvement.is_repeat = false;
                changed
            }
            None => skip_unknown("disable_improvement_repeat", &id),
        },
        ImprovementAction::ClearHiddenImprovements => {
            let changed =
                !state.hidden_improvement_banner_items.is_empty() || state.hide_day.is_some();
            state.hidden_improvement_banner_items.clear();
            state.hide_day = None;
            changed
        }
    }
}

pub fn reduce_metric(state: &mut MetricState, action: MetricAction) -> bool {
    match action {
        MetricAction::LoadMetricState { state: loaded } => {
            *state = loaded;
            true
        }
        MetricAction::UpsertMetric { metric } => {
            if !is_valid_day(&metric.id) {
                return skip_invalid("upsert_metric", &metric.id);
            }
            state.upsert(metric);
            true
        }
        MetricAction::DeleteMetric { id } => state.remove(&id).is_some(),
    }
}

fn skip_invalid(action: &str, id: &str) -> bool {
    debug!("event=reduce module=store status=skipped action={action} reason=invalid_day id={id}");
    false
}

fn skip_unknown(action: &str, id: &str) -> bool {
    debug!("event=reduce module=store status=skipped action={action} reason=unknown_id id={id}");
    false
}
