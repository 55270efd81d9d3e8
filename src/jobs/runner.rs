//! Job Runner
//!
//! Executes reconciliation jobs with an overlap guard and a timeout, and
//! drives them from background tasks on their schedules.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{Result, TaskError};
use crate::jobs::{
    reset_daily_flags, rollover_due_dates, sleep_until_local, sweep_overdue, JobKind, JobStats,
    Schedule, SweepReport, DAILY_POLL,
};
use crate::store::TaskStore;

// == Run Outcome ==
/// Result of one invocation of [`JobRunner::run`].
#[derive(Debug)]
pub enum RunOutcome {
    /// The job went through every selected record
    Completed(SweepReport),
    /// The store could not be read; the next tick retries
    Failed(TaskError),
    /// The run exceeded the job timeout and was dropped
    TimedOut,
    /// The same job was already running
    Skipped,
}

// == Job Runner ==
/// Shared executor for the scheduled jobs.
pub struct JobRunner {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    /// One flag per [`JobKind`], indexed by discriminant
    running: [AtomicBool; 3],
    stats: RwLock<HashMap<JobKind, JobStats>>,
}

/// Clears a running flag when the run ends, including on timeout.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl JobRunner {
    // == Constructor ==
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        let stats = JobKind::ALL
            .into_iter()
            .map(|job| (job, JobStats::new()))
            .collect();

        Self {
            store,
            clock,
            timeout,
            running: Default::default(),
            stats: RwLock::new(stats),
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // == Run ==
    /// Runs `job` once against the current clock.
    ///
    /// Returns [`RunOutcome::Skipped`] without touching the store when the
    /// same job is still in flight.
    pub async fn run(&self, job: JobKind) -> RunOutcome {
        let Some(_guard) = RunningGuard::acquire(&self.running[job as usize]) else {
            warn!("Job {} still running, skipping this tick", job);
            self.update_stats(job, |stats| stats.record_skipped()).await;
            return RunOutcome::Skipped;
        };

        let started_at = self.clock.now();
        self.update_stats(job, |stats| stats.record_start(started_at))
            .await;

        let outcome = match tokio::time::timeout(self.timeout, self.execute(job, started_at)).await
        {
            Ok(Ok(report)) => RunOutcome::Completed(report),
            Ok(Err(err)) => RunOutcome::Failed(err),
            Err(_) => RunOutcome::TimedOut,
        };

        match &outcome {
            RunOutcome::Completed(report) => {
                if report.failed > 0 {
                    warn!(
                        "Job {} completed with {} failed writes ({} updated)",
                        job, report.failed, report.updated
                    );
                } else {
                    debug!("Job {} completed: {:?}", job, report);
                }
                self.update_stats(job, |stats| stats.record_completed(report))
                    .await;
            }
            RunOutcome::Failed(err) => {
                error!("Job {} aborted, retrying next tick: {}", job, err);
                let message = err.to_string();
                self.update_stats(job, |stats| stats.record_failed(&message))
                    .await;
            }
            RunOutcome::TimedOut => {
                warn!("Job {} exceeded timeout of {:?}", job, self.timeout);
                self.update_stats(job, |stats| stats.record_timed_out())
                    .await;
            }
            RunOutcome::Skipped => {}
        }

        outcome
    }

    async fn execute(&self, job: JobKind, now: NaiveDateTime) -> Result<SweepReport> {
        let store = self.store.as_ref();
        match job {
            JobKind::OverdueSweep => sweep_overdue(store, now).await,
            JobKind::DailyRollover => rollover_due_dates(store, now.date()).await,
            JobKind::DailyReset => reset_daily_flags(store).await,
        }
    }

    // == Stats ==
    /// Snapshot of every job's statistics.
    pub async fn stats(&self) -> HashMap<JobKind, JobStats> {
        self.stats.read().await.clone()
    }

    async fn update_stats(&self, job: JobKind, apply: impl FnOnce(&mut JobStats)) {
        let mut stats = self.stats.write().await;
        apply(stats.entry(job).or_default());
    }
}

// == Spawning ==
/// Spawns a background task that runs `job` on `schedule` until aborted.
///
/// Interval schedules fire immediately, then skip ticks missed while a run
/// was in progress instead of queueing them. Daily schedules wait on the
/// runner's wall clock, so they fire at the configured local time even on
/// days that are not 24 hours long.
pub fn spawn_job(runner: Arc<JobRunner>, job: JobKind, schedule: Schedule) -> JoinHandle<()> {
    spawn_job_polling(runner, job, schedule, DAILY_POLL)
}

fn spawn_job_polling(
    runner: Arc<JobRunner>,
    job: JobKind,
    schedule: Schedule,
    poll: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting {} job, {}", job, schedule);

        match schedule {
            Schedule::Interval(every) => {
                let mut ticker = tokio::time::interval(every.max(Duration::from_millis(1)));
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    ticker.tick().await;
                    runner.run(job).await;
                }
            }
            Schedule::DailyAt(at) => loop {
                let Some(next) = Schedule::next_daily(runner.clock().now(), at) else {
                    error!("Job {} has no next occurrence of {}, stopping", job, at);
                    return;
                };
                debug!("Job {} waiting until {}", job, next);
                sleep_until_local(runner.clock().as_ref(), next, poll).await;
                runner.run(job).await;
            },
        }
    })
}

/// Spawns all three jobs with the schedules from `config`.
///
/// The returned handles should be aborted on shutdown.
pub fn spawn_scheduler(runner: Arc<JobRunner>, config: &Config) -> Vec<JoinHandle<()>> {
    if let Some(warning) = config.schedule_warning() {
        warn!("Schedule order: {}", warning);
    }

    vec![
        spawn_job(
            runner.clone(),
            JobKind::OverdueSweep,
            Schedule::Interval(config.sweep_interval()),
        ),
        spawn_job(
            runner.clone(),
            JobKind::DailyRollover,
            Schedule::DailyAt(config.rollover_at),
        ),
        spawn_job(runner, JobKind::DailyReset, Schedule::DailyAt(config.reset_at)),
    ]
}
