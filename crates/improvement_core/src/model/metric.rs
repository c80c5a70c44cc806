//! Daily metric model.
//!
//! A metric is keyed by its work-log day. The latest day is the
//! "last tracked" metric that feeds the improvement banner.

use crate::model::improvement::ImprovementId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Work-log day in `YYYY-MM-DD` form.
    pub id: String,
    #[serde(default)]
    pub obstructions: Vec<String>,
    /// Improvements worked on that day.
    #[serde(default)]
    pub improvements: Vec<ImprovementId>,
    /// Improvements picked for the following day.
    #[serde(default)]
    pub improvements_tomorrow: Vec<ImprovementId>,
    pub mood: Option<i32>,
    pub productivity: Option<i32>,
}

impl Metric {
    pub fn for_day(day: impl Into<String>) -> Self {
        Self {
            id: day.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricState {
    pub ids: Vec<String>,
    pub entities: HashMap<String, Metric>,
}

impl MetricState {
    pub fn initial() -> Self {
        Self::default()
    }

    /// Inserts or replaces by day id, keeping first-insert position.
    pub fn upsert(&mut self, metric: Metric) {
        if !self.entities.contains_key(&metric.id) {
            self.ids.push(metric.id.clone());
        }
        self.entities.insert(metric.id.clone(), metric);
    }

    pub fn remove(&mut self, id: &str) -> Option<Metric> {
        let removed = self.entities.remove(id)?;
        self.ids.retain(|existing| existing != id);
        Some(removed)
    }

    /// Metric with the greatest day id.
    ///
    /// `YYYY-MM-DD` ids sort chronologically as plain strings.
    pub fn last_tracked(&self) -> Option<&Metric> {
        self.entities
            .values()
            .max_by(|left, right| left.id.cmp(&right.id))
    }
}
