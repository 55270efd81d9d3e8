//! Task Entity Module
//!
//! Defines the recurring daily task record and its state transitions.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::presets::Preset;

/// Store-assigned task identifier.
pub type TaskId = u64;

// == Task ==
/// A daily reminder.
///
/// Transitions consume the task and return the next version; nothing is
/// persisted until the caller hands the result to [`crate::store::TaskStore::save`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Assigned by the store on first save
    pub id: Option<TaskId>,
    /// Free-text label
    pub name: String,
    /// Local timestamp the task should next be completed by
    pub due_time: NaiveDateTime,
    /// Completed for the current cycle
    pub checked: bool,
    /// Flagged overdue for the current cycle
    pub alarm_triggered: bool,
    /// Routine this task was loaded from, if any
    #[serde(default)]
    pub preset_type: Option<Preset>,
}

impl Task {
    // == Constructor ==
    /// Creates an unsaved, unchecked task.
    pub fn new(name: impl Into<String>, due_time: NaiveDateTime) -> Self {
        Self {
            id: None,
            name: name.into(),
            due_time,
            checked: false,
            alarm_triggered: false,
            preset_type: None,
        }
    }

    /// Marks the task as loaded from `preset`.
    pub fn with_preset(self, preset: Preset) -> Self {
        Self {
            preset_type: Some(preset),
            ..self
        }
    }

    // == Predicates ==
    /// Created by loading a preset rather than by hand.
    pub fn is_preset(&self) -> bool {
        self.preset_type.is_some()
    }

    /// Unchecked and strictly past due at `now`.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.checked && self.due_time < now
    }

    /// Due on a date strictly before `today`.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.due_time.date() < today
    }

    // == Transitions ==
    /// Flags the task as overdue. No other field changes.
    pub fn mark_alarm_triggered(self) -> Self {
        Self {
            alarm_triggered: true,
            ..self
        }
    }

    /// Moves the due date to `today`, keeping the time-of-day verbatim, and
    /// starts a fresh cycle.
    pub fn rolled_over_to(self, today: NaiveDate) -> Self {
        let due_time = today.and_time(self.due_time.time());
        Self {
            due_time,
            ..self
        }
        .reset_flags()
    }

    /// Clears both cycle flags, leaving the due time alone.
    pub fn reset_flags(self) -> Self {
        Self {
            checked: false,
            alarm_triggered: false,
            ..self
        }
    }
}
