//! In-Memory Task Store
//!
//! BTreeMap-backed store guarded by a tokio RwLock.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use crate::error::{Result, TaskError};
use crate::store::{Task, TaskId, TaskStore};

// == In-Memory Store ==
/// Process-local task storage.
#[derive(Debug)]
pub struct InMemoryTaskStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Records keyed by id
    tasks: BTreeMap<TaskId, Task>,
    /// Next id to hand out; ids are never reused
    next_id: TaskId,
}

impl InMemoryTaskStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tasks: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    // == Length ==
    /// Returns the number of stored tasks.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.tasks.len()
    }

    // == Is Empty ==
    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.tasks.is_empty()
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Orders by due time, breaking ties by id.
fn sort_by_due_time(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.due_time.cmp(&b.due_time).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn find_all(&self) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self.inner.read().await.tasks.values().cloned().collect();
        sort_by_due_time(&mut tasks);
        Ok(tasks)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn find_unchecked_due_before(&self, at: NaiveDateTime) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .inner
            .read()
            .await
            .tasks
            .values()
            .filter(|task| task.is_overdue(at))
            .cloned()
            .collect();
        sort_by_due_time(&mut tasks);
        Ok(tasks)
    }

    async fn save(&self, mut task: Task) -> Result<Task> {
        let mut inner = self.inner.write().await;

        let id = match task.id {
            Some(id) if inner.tasks.contains_key(&id) => id,
            Some(id) => return Err(TaskError::NotFound(id)),
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                task.id = Some(id);
                id
            }
        };

        inner.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        match self.inner.write().await.tasks.remove(&id) {
            Some(_) => Ok(()),
            None => Err(TaskError::NotFound(id)),
        }
    }
}
