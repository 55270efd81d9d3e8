//! API Module
//!
//! HTTP handlers and routing for the reminder server REST API.
//!
//! # Endpoints
//! - `POST /tasks` - Create a task
//! - `GET /tasks` - List tasks
//! - `GET|PUT|DELETE /tasks/:id` - Read, replace or delete a task
//! - `GET /presets` - List built-in routines
//! - `POST /presets/:name` - Load a routine, replacing the previous one
//! - `DELETE /presets` - Remove loaded routine tasks
//! - `GET /stats` - Scheduled job statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
