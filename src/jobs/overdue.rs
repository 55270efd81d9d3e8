//! Overdue Sweep
//!
//! Flags every unchecked task whose due time has passed.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::Result;
use crate::jobs::{persist_each, JobKind, SweepReport};
use crate::store::TaskStore;

/// Sets `alarm_triggered` on unchecked tasks due strictly before `now`.
///
/// A read failure aborts the run. A user checking a task between the query
/// and the write does not stop the write; the alarm flag lands anyway.
pub async fn sweep_overdue(store: &dyn TaskStore, now: NaiveDateTime) -> Result<SweepReport> {
    let overdue = store.find_unchecked_due_before(now).await?;

    let report = persist_each(
        store,
        JobKind::OverdueSweep,
        overdue.into_iter().map(|task| task.mark_alarm_triggered()),
    )
    .await;

    if report.updated > 0 {
        info!("Overdue sweep: flagged {} tasks", report.updated);
    } else {
        debug!("Overdue sweep: no overdue tasks found");
    }

    Ok(report)
}
