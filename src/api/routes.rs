//! API Routes
//!
//! Configures the Axum router with all reminder server endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    apply_preset_handler, clear_presets_handler, create_task_handler, delete_task_handler,
    get_task_handler, health_handler, list_presets_handler, list_tasks_handler, stats_handler,
    update_task_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /tasks` - Create a task due today at a time of day
/// - `GET /tasks` - List tasks ordered by due time
/// - `GET /tasks/:id` - Fetch one task
/// - `PUT /tasks/:id` - Replace a task's fields
/// - `DELETE /tasks/:id` - Delete a task
/// - `GET /presets` - List built-in routines
/// - `POST /presets/:name` - Replace all preset tasks with a routine
/// - `DELETE /presets` - Remove all preset tasks
/// - `GET /stats` - Scheduled job statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/:id",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .route(
            "/presets",
            get(list_presets_handler).delete(clear_presets_handler),
        )
        .route("/presets/:name", post(apply_preset_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
