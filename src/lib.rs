//! Diditakeit - A daily task-reminder server
//!
//! Tasks carry a due time of day and recur every day: a frequent sweep flags
//! unchecked tasks once they are overdue, a midnight rollover moves stale due
//! dates to today, and a 4am reset clears every task's flags. Built-in
//! routines can be loaded as a set of tasks in one step.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod presets;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use jobs::spawn_scheduler;
