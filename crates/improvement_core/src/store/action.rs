//! Store commands. One variant per mutation.

use crate::model::improvement::{Improvement, ImprovementChanges, ImprovementId, ImprovementState};
use crate::model::metric::{Metric, MetricState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImprovementAction {
    LoadImprovementState {
        state: ImprovementState,
    },
    AddImprovement {
        improvement: Improvement,
    },
    UpdateImprovement {
        id: ImprovementId,
        changes: ImprovementChanges,
    },
    AddImprovementCheckedDay {
        id: ImprovementId,
        checked_day: String,
    },
    DeleteImprovement {
        id: ImprovementId,
    },
    DeleteImprovements {
        ids: Vec<ImprovementId>,
    },
    /// Hides from the banner; `day` is recorded as the hide day.
    HideImprovement {
        id: ImprovementId,
        day: String,
    },
    ToggleImprovementRepeat {
        id: ImprovementId,
    },
    DisableImprovementRepeat {
        id: ImprovementId,
    },
    ClearHiddenImprovements,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricAction {
    LoadMetricState { state: MetricState },
    UpsertMetric { metric: Metric },
    DeleteMetric { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Improvement(ImprovementAction),
    Metric(MetricAction),
}

impl Action {
    /// Stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Improvement(action) => match action {
                ImprovementAction::LoadImprovementState { .. } => "load_improvement_state",
                ImprovementAction::AddImprovement { .. } => "add_improvement",
                ImprovementAction::UpdateImprovement { .. } => "update_improvement",
                ImprovementAction::AddImprovementCheckedDay { .. } => {
                    "add_improvement_checked_day"
                }
                ImprovementAction::DeleteImprovement { .. } => "delete_improvement",
                ImprovementAction::DeleteImprovements { .. } => "delete_improvements",
                ImprovementAction::HideImprovement { .. } => "hide_improvement",
                ImprovementAction::ToggleImprovementRepeat { .. } => "toggle_improvement_repeat",
                ImprovementAction::DisableImprovementRepeat { .. } => "disable_improvement_repeat",
                ImprovementAction::ClearHiddenImprovements => "clear_hidden_improvements",
            },
            Self::Metric(action) => match action {
                MetricAction::LoadMetricState { .. } => "load_metric_state",
                MetricAction::UpsertMetric { .. } => "upsert_metric",
                MetricAction::DeleteMetric { .. } => "delete_metric",
            },
        }
    }
}

impl From<ImprovementAction> for Action {
    fn from(value: ImprovementAction) -> Self {
        Self::Improvement(value)
    }
}

impl From<MetricAction> for Action {
    fn from(value: MetricAction) -> Self {
        Self::Metric(value)
    }
}
