//! Task Store Module
//!
//! Keyed storage for task records behind an async trait, with an in-memory
//! implementation used by the server and the tests.

mod memory;
mod task;

pub use memory::InMemoryTaskStore;
pub use task::{Task, TaskId};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::Result;

// == Task Store ==
/// Durable storage for [`Task`] records.
///
/// Writes are per record; nothing spans more than one task, and concurrent
/// writers to the same record resolve as last-writer-wins.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks ordered by due time, then id.
    async fn find_all(&self) -> Result<Vec<Task>>;

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>>;

    /// Unchecked tasks whose due time is strictly before `at`.
    async fn find_unchecked_due_before(&self, at: NaiveDateTime) -> Result<Vec<Task>>;

    /// Inserts a task without an id, or replaces the stored record with the
    /// same id. Replacing a record that no longer exists yields
    /// [`crate::error::TaskError::NotFound`].
    async fn save(&self, task: Task) -> Result<Task>;

    async fn delete(&self, id: TaskId) -> Result<()>;
}
