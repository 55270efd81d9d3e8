//! Background Jobs Module
//!
//! Time-driven reconciliation of task state, run periodically during server
//! operation.
//!
//! # Jobs
//! - Overdue Sweep: flags unchecked tasks whose due time has passed
//! - Daily Rollover: moves stale due dates to today and starts a fresh cycle
//! - Daily Reset: clears checked and alarm flags on every task

mod overdue;
mod reset;
mod rollover;
mod runner;
mod schedule;
mod stats;


pub use overdue::sweep_overdue;
pub use reset::reset_daily_flags;
pub use rollover::rollover_due_dates;
pub use runner::{spawn_job, spawn_scheduler, JobRunner, RunOutcome};
pub use schedule::{sleep_until_local, Schedule, DAILY_POLL};
pub use stats::JobStats;

use std::fmt;

use tracing::{debug, warn};

use crate::error::TaskError;
use crate::store::{Task, TaskStore};

// == Job Kind ==
/// The scheduled reconciliation jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    OverdueSweep,
    DailyRollover,
    DailyReset,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [
        JobKind::OverdueSweep,
        JobKind::DailyRollover,
        JobKind::DailyReset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            JobKind::OverdueSweep => "overdue_sweep",
            JobKind::DailyRollover => "daily_rollover",
            JobKind::DailyReset => "daily_reset",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// == Sweep Report ==
/// Per-record tally of one job run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub job: JobKind,
    /// Tasks the job selected for writing
    pub examined: usize,
    /// Records persisted
    pub updated: usize,
    /// Records deleted between read and write
    pub skipped: usize,
    /// Records whose write failed
    pub failed: usize,
}

impl SweepReport {
    fn new(job: JobKind) -> Self {
        Self {
            job,
            examined: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

/// Saves each task independently so one bad record cannot abort the batch.
async fn persist_each<I>(store: &dyn TaskStore, job: JobKind, tasks: I) -> SweepReport
where
    I: IntoIterator<Item = Task>,
{
    let mut report = SweepReport::new(job);

    for task in tasks {
        report.examined += 1;
        let id = task.id;

        match store.save(task).await {
            Ok(_) => report.updated += 1,
            Err(TaskError::NotFound(id)) => {
                debug!(%job, id, "task deleted before write, skipping");
                report.skipped += 1;
            }
            Err(err) => {
                let err = match id {
                    Some(id) => err.for_record(id),
                    None => err,
                };
                warn!(%job, error = %err, "failed to persist task");
                report.failed += 1;
            }
        }
    }

    report
}
