//! Response DTOs for the reminder API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::jobs::{JobKind, JobStats};
use crate::presets::{Preset, PresetApplied};
use crate::store::{Task, TaskId};

/// Response body for the DELETE operation (DELETE /tasks/:id)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The id that was deleted
    pub id: TaskId,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(id: TaskId) -> Self {
        Self {
            message: format!("Task {} deleted successfully", id),
            id,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Statistics keyed by job name
    pub jobs: BTreeMap<&'static str, JobStats>,
}

impl StatsResponse {
    /// Creates a new StatsResponse from the runner's per-job statistics
    pub fn new(stats: HashMap<JobKind, JobStats>) -> Self {
        Self {
            jobs: stats
                .into_iter()
                .map(|(job, stats)| (job.name(), stats))
                .collect(),
        }
    }
}

/// One entry of the preset catalog (GET /presets)
#[derive(Debug, Clone, Serialize)]
pub struct PresetResponse {
    pub name: &'static str,
    pub items: Vec<PresetItemResponse>,
}

/// A routine task as `{"time": "HH:MM", "name": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct PresetItemResponse {
    pub time: String,
    pub name: &'static str,
}

impl From<Preset> for PresetResponse {
    fn from(preset: Preset) -> Self {
        Self {
            name: preset.name(),
            items: preset
                .items()
                .iter()
                .map(|item| PresetItemResponse {
                    time: item.time_label(),
                    name: item.name,
                })
                .collect(),
        }
    }
}

/// Response body for loading or clearing a preset
/// (POST /presets/:name, DELETE /presets)
#[derive(Debug, Clone, Serialize)]
pub struct PresetAppliedResponse {
    /// Preset tasks deleted
    pub removed: usize,
    /// Tasks created
    pub tasks: Vec<Task>,
}

impl From<PresetApplied> for PresetAppliedResponse {
    fn from(applied: PresetApplied) -> Self {
        Self {
            removed: applied.removed,
            tasks: applied.created,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
