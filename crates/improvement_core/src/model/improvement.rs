//! Improvement domain model.
//!
//! # Responsibility
//! - Define the improvement record and its partial-update patch.
//! - Define the entity collection owned by the store.
//!
//! # Invariants
//! - `id` is stable and never reused for another improvement.
//! - `ids` and `entities` of `ImprovementState` always describe the same set.
//! - `checked_days` holds `YYYY-MM-DD` strings in append order.

use crate::worklog::is_valid_day;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque, URL-safe identifier of one improvement.
pub type ImprovementId = String;

/// A user-authored self-improvement note with optional repeat tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvement {
    pub id: ImprovementId,
    pub title: String,
    /// Recurring improvements are always offered in the daily banner.
    #[serde(default)]
    pub is_repeat: bool,
    /// Days on which the improvement was marked as done.
    #[serde(default)]
    pub checked_days: Vec<String>,
}

impl Improvement {
    /// Creates a fresh, non-repeating improvement with no checked days.
    pub fn new(id: impl Into<ImprovementId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_repeat: false,
            checked_days: Vec::new(),
        }
    }

    /// Validates identity and checked-day formatting.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    /// - `InvalidCheckedDay` when any entry is not a `YYYY-MM-DD` date.
    pub fn validate(&self) -> Result<(), ImprovementValidationError> {
        if self.id.trim().is_empty() {
            return Err(ImprovementValidationError::EmptyId);
        }
        if let Some(day) = self.checked_days.iter().find(|day| !is_valid_day(day)) {
            return Err(ImprovementValidationError::InvalidCheckedDay {
                id: self.id.clone(),
                day: day.clone(),
            });
        }
        Ok(())
    }

    /// Applies a partial patch. The id is never touched.
    pub fn apply(&mut self, changes: &ImprovementChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(is_repeat) = changes.is_repeat {
            self.is_repeat = is_repeat;
        }
        if let Some(checked_days) = &changes.checked_days {
            self.checked_days = checked_days.clone();
        }
    }
}

/// Field-level patch for `Improvement`. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementChanges {
    pub title: Option<String>,
    pub is_repeat: Option<bool>,
    pub checked_days: Option<Vec<String>>,
}

impl ImprovementChanges {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.is_repeat.is_none() && self.checked_days.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImprovementValidationError {
    EmptyId,
    InvalidCheckedDay { id: ImprovementId, day: String },
    EntityIndexMismatch(ImprovementId),
}

impl Display for ImprovementValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "improvement id cannot be empty"),
            Self::InvalidCheckedDay { id, day } => {
                write!(f, "improvement {id} has invalid checked day `{day}`")
            }
            Self::EntityIndexMismatch(id) => {
                write!(f, "improvement {id} is not consistent between ids and entities")
            }
        }
    }
}

impl Error for ImprovementValidationError {}

/// Full improvement collection plus banner bookkeeping.
///
/// Serialized shape matches the persisted snapshot format:
/// `{ ids, entities, hiddenImprovementBannerItems, hideDay }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementState {
    pub ids: Vec<ImprovementId>,
    pub entities: HashMap<ImprovementId, Improvement>,
    /// Ids hidden from the banner until cleared.
    #[serde(default)]
    pub hidden_improvement_banner_items: Vec<ImprovementId>,
    /// Day on which the banner items were last hidden.
    #[serde(default)]
    pub hide_day: Option<String>,
}

impl ImprovementState {
    /// Empty state installed when no snapshot exists.
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Improvement> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Improvement> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Improvements in insertion order.
    pub fn all(&self) -> Vec<Improvement> {
        self.ids
            .iter()
            .filter_map(|id| self.entities.get(id))
            .cloned()
            .collect()
    }

    /// Inserts a record unless the id is already taken.
    ///
    /// Returns `false` when the insert was skipped.
    pub fn insert(&mut self, improvement: Improvement) -> bool {
        if self.entities.contains_key(&improvement.id) {
            return false;
        }
        self.ids.push(improvement.id.clone());
        self.entities.insert(improvement.id.clone(), improvement);
        true
    }

    /// Removes a record and any banner reference to it.
    pub fn remove(&mut self, id: &str) -> Option<Improvement> {
        let removed = self.entities.remove(id)?;
        self.ids.retain(|existing| existing != id);
        self.hidden_improvement_banner_items
            .retain(|existing| existing != id);
        Some(removed)
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden_improvement_banner_items
            .iter()
            .any(|hidden| hidden == id)
    }

    /// Checks index consistency and every record.
    pub fn validate(&self) -> Result<(), ImprovementValidationError> {
        if self.ids.len() != self.entities.len() {
            let orphan = self
                .entities
                .keys()
                .find(|id| !self.ids.contains(id))
                .or_else(|| self.ids.first())
                .cloned()
                .unwrap_or_default();
            return Err(ImprovementValidationError::EntityIndexMismatch(orphan));
        }
        for id in &self.ids {
            let improvement = self
                .entities
                .get(id)
                .ok_or_else(|| ImprovementValidationError::EntityIndexMismatch(id.clone()))?;
            if &improvement.id != id {
                return Err(ImprovementValidationError::EntityIndexMismatch(id.clone()));
            }
            improvement.validate()?;
        }
        Ok(())
    }
}
