//! API Handlers
//!
//! HTTP request handlers for each reminder server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TaskError};
use crate::jobs::JobRunner;
use crate::models::{
    CreateTaskRequest, DeleteResponse, HealthResponse, PresetAppliedResponse, PresetResponse,
    StatsResponse, UpdateTaskRequest,
};
use crate::presets::{apply_preset, Preset};
use crate::store::{InMemoryTaskStore, Task, TaskId, TaskStore};

/// Application state shared across all handlers.
///
/// The store and clock are the same handles the job runner uses.
#[derive(Clone)]
pub struct AppState {
    /// Task storage
    pub store: Arc<dyn TaskStore>,
    /// Local wall-clock time
    pub clock: Arc<dyn Clock>,
    /// Scheduled job executor
    pub runner: Arc<JobRunner>,
}

impl AppState {
    /// Creates a new AppState around the given store and clock.
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>, job_timeout: Duration) -> Self {
        let runner = Arc::new(JobRunner::new(store.clone(), clock.clone(), job_timeout));
        Self {
            store,
            clock,
            runner,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Uses the in-memory store and the system's local clock.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(SystemClock),
            config.job_timeout(),
        )
    }
}

/// Handler for POST /tasks
///
/// Creates an unchecked task due today at the supplied time of day.
pub async fn create_task_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>)> {
    if let Some(error_msg) = req.validate() {
        return Err(TaskError::InvalidRequest(error_msg));
    }

    let due_time = req
        .due_time_on(state.clock.today())
        .ok_or_else(|| TaskError::InvalidRequest(format!("invalid dueTime '{}'", req.due_time)))?;

    let task = state.store.save(Task::new(req.name, due_time)).await?;
    info!("Created task {:?} due {}", task.id, task.due_time);

    Ok((StatusCode::CREATED, Json(task)))
}

/// Handler for GET /tasks
///
/// Lists all tasks ordered by due time.
pub async fn list_tasks_handler(State(state): State<AppState>) -> Result<Json<Vec<Task>>> {
    Ok(Json(state.store.find_all().await?))
}

/// Handler for GET /tasks/:id
pub async fn get_task_handler(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>> {
    state
        .store
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(TaskError::NotFound(id))
}

/// Handler for PUT /tasks/:id
///
/// Replaces the editable fields of an existing task.
pub async fn update_task_handler(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    if let Some(error_msg) = req.validate() {
        return Err(TaskError::InvalidRequest(error_msg));
    }

    let task = Task {
        id: Some(id),
        name: req.name,
        due_time: req.due_time,
        checked: req.checked,
        alarm_triggered: req.alarm_triggered,
        preset_type: req.preset_type,
    };

    Ok(Json(state.store.save(task).await?))
}

/// Handler for DELETE /tasks/:id
pub async fn delete_task_handler(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<Json<DeleteResponse>> {
    state.store.delete(id).await?;
    info!("Deleted task {}", id);

    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for GET /presets
///
/// Lists the built-in routines and their tasks.
pub async fn list_presets_handler() -> Json<Vec<PresetResponse>> {
    Json(Preset::ALL.into_iter().map(PresetResponse::from).collect())
}

/// Handler for POST /presets/:name
///
/// Replaces all preset tasks with the named routine, due today.
pub async fn apply_preset_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<PresetAppliedResponse>)> {
    let preset: Preset = name.parse()?;
    let applied = apply_preset(state.store.as_ref(), Some(preset), state.clock.today()).await?;

    Ok((StatusCode::CREATED, Json(applied.into())))
}

/// Handler for DELETE /presets
///
/// Removes every task loaded from a preset.
pub async fn clear_presets_handler(
    State(state): State<AppState>,
) -> Result<Json<PresetAppliedResponse>> {
    let applied = apply_preset(state.store.as_ref(), None, state.clock.today()).await?;
    Ok(Json(applied.into()))
}

/// Handler for GET /stats
///
/// Returns run statistics for each scheduled job.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.runner.stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
