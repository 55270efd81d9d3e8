//! Daily Rollover
//!
//! Turns a single due timestamp into a recurring daily reminder: tasks due
//! on an earlier date are moved to today at the same time-of-day.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Result;
use crate::jobs::{persist_each, JobKind, SweepReport};
use crate::store::TaskStore;

/// Advances every task due before `today` to `today`, clearing its flags.
///
/// Tasks due on `today` or later are not written at all.
pub async fn rollover_due_dates(store: &dyn TaskStore, today: NaiveDate) -> Result<SweepReport> {
    let stale = store
        .find_all()
        .await?
        .into_iter()
        .filter(|task| task.is_stale(today))
        .map(|task| task.rolled_over_to(today));

    let report = persist_each(store, JobKind::DailyRollover, stale).await;

    if report.updated > 0 {
        info!("Daily rollover: moved {} tasks to {}", report.updated, today);
    } else {
        debug!("Daily rollover: no stale tasks for {}", today);
    }

    Ok(report)
}
