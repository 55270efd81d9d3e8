//! Request DTOs for the reminder API
//!
//! Defines the structure of incoming HTTP request bodies.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::config::parse_clock_time;
use crate::presets::Preset;

/// Maximum allowed task name length in bytes
pub const MAX_NAME_LENGTH: usize = 256;

/// Request body for creating a task (POST /tasks)
///
/// # Fields
/// - `name`: Label of the reminder
/// - `dueTime`: Time of day, `HH:MM` or `HH:MM:SS`; the date is today
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: String,
    pub due_time: String,
}

impl CreateTaskRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(error) = validate_name(&self.name) {
            return Some(error);
        }
        if parse_clock_time(&self.due_time).is_none() {
            return Some(format!(
                "dueTime '{}' is not a time of day (expected HH:MM)",
                self.due_time
            ));
        }
        None
    }

    /// The due timestamp on `today`, if the time of day parses.
    pub fn due_time_on(&self, today: NaiveDate) -> Option<NaiveDateTime> {
        parse_clock_time(&self.due_time).map(|time| today.and_time(time))
    }
}

/// Request body for replacing a task's fields (PUT /tasks/:id)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub name: String,
    pub due_time: NaiveDateTime,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub alarm_triggered: bool,
    #[serde(default)]
    pub preset_type: Option<Preset>,
}

impl UpdateTaskRequest {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        validate_name(&self.name)
    }
}

fn validate_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return Some("Task name cannot be empty".to_string());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Some(format!(
            "Task name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        ));
    }
    None
}
