//! Daily Reset
//!
//! Starts every task's day unchecked and unalarmed, whatever its due date.

use tracing::info;

use crate::error::Result;
use crate::jobs::{persist_each, JobKind, SweepReport};
use crate::store::TaskStore;

/// Clears `checked` and `alarm_triggered` on all tasks. Due times are kept.
pub async fn reset_daily_flags(store: &dyn TaskStore) -> Result<SweepReport> {
    let tasks = store.find_all().await?;

    let report = persist_each(
        store,
        JobKind::DailyReset,
        tasks.into_iter().map(|task| task.reset_flags()),
    )
    .await;

    info!("Daily reset: cleared flags on {} tasks", report.updated);
    Ok(report)
}
