//! Integration Tests for the Reconciliation Jobs
//!
//! Drives the sweep, rollover and reset through a day-by-day scenario and
//! against a store that injects read failures, write failures and
//! concurrent user edits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diditakeit::{
    clock::FixedClock,
    error::{Result, TaskError},
    jobs::{
        reset_daily_flags, rollover_due_dates, sweep_overdue, JobKind, JobRunner, RunOutcome,
    },
    store::{InMemoryTaskStore, Task, TaskId, TaskStore},
};

// == Helper Functions ==

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    day(d).and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

/// What happens when a given record is written.
#[derive(Debug, Clone, Copy)]
enum Fault {
    /// The write fails
    FailWrite,
    /// The user deletes the task just before the write
    DeleteBeforeWrite,
    /// The user checks the task just before the write
    CheckBeforeWrite,
}

/// In-memory store with injectable failures and interleavings.
#[derive(Default)]
struct FaultyStore {
    inner: InMemoryTaskStore,
    fail_reads: AtomicBool,
    faults: Mutex<HashMap<TaskId, Fault>>,
}

impl FaultyStore {
    fn inject(&self, id: TaskId, fault: Fault) {
        self.faults.lock().unwrap().insert(id, fault);
    }

    fn take_fault(&self, id: Option<TaskId>) -> Option<(TaskId, Fault)> {
        let id = id?;
        self.faults.lock().unwrap().remove(&id).map(|f| (id, f))
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(TaskError::StoreUnavailable("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskStore for FaultyStore {
    async fn find_all(&self) -> Result<Vec<Task>> {
        self.check_reads()?;
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        self.check_reads()?;
        self.inner.find_by_id(id).await
    }

    async fn find_unchecked_due_before(&self, at: NaiveDateTime) -> Result<Vec<Task>> {
        self.check_reads()?;
        self.inner.find_unchecked_due_before(at).await
    }

    async fn save(&self, task: Task) -> Result<Task> {
        match self.take_fault(task.id) {
            Some((id, Fault::FailWrite)) => {
                return Err(TaskError::RecordWriteFailed {
                    id,
                    reason: "disk full".into(),
                })
            }
            Some((id, Fault::DeleteBeforeWrite)) => self.inner.delete(id).await?,
            Some((id, Fault::CheckBeforeWrite)) => {
                if let Some(current) = self.inner.find_by_id(id).await? {
                    self.inner
                        .save(Task {
                            checked: true,
                            ..current
                        })
                        .await?;
                }
            }
            None => {}
        }
        self.inner.save(task).await
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        self.inner.delete(id).await
    }
}

async fn seed(store: &dyn TaskStore, tasks: Vec<Task>) -> Vec<TaskId> {
    let mut ids = Vec::new();
    for task in tasks {
        ids.push(store.save(task).await.unwrap().id.unwrap());
    }
    ids
}

async fn fetch(store: &dyn TaskStore, id: TaskId) -> Task {
    store.find_by_id(id).await.unwrap().unwrap()
}

// == Day-by-Day Scenario ==

#[tokio::test]
async fn test_meds_scenario_across_two_days() {
    let store = InMemoryTaskStore::new();
    let ids = seed(&store, vec![Task::new("meds", at(1, 9, 0))]).await;
    let meds = ids[0];

    // Day 2, midnight: yesterday's 09:00 becomes today's 09:00.
    rollover_due_dates(&store, day(2)).await.unwrap();
    let task = fetch(&store, meds).await;
    assert_eq!(task.due_time, at(2, 9, 0));
    assert!(!task.checked);
    assert!(!task.alarm_triggered);

    // Day 2, 10:00: not taken, so the sweep raises the alarm.
    sweep_overdue(&store, at(2, 10, 0)).await.unwrap();
    assert!(fetch(&store, meds).await.alarm_triggered);

    // Day 3: midnight rollover, then the 04:00 reset.
    rollover_due_dates(&store, day(3)).await.unwrap();
    reset_daily_flags(&store).await.unwrap();
    let task = fetch(&store, meds).await;
    assert_eq!(task.due_time, at(3, 9, 0));
    assert!(!task.checked);
    assert!(!task.alarm_triggered);
}

#[tokio::test]
async fn test_checked_task_survives_sweep_then_resets_next_day() {
    let store = InMemoryTaskStore::new();
    let ids = seed(&store, vec![Task::new("walk", at(2, 7, 0))]).await;
    let walk = ids[0];

    // The user checks the task before it is due.
    let task = fetch(&store, walk).await;
    store
        .save(Task {
            checked: true,
            ..task
        })
        .await
        .unwrap();

    sweep_overdue(&store, at(2, 23, 0)).await.unwrap();
    let task = fetch(&store, walk).await;
    assert!(task.checked);
    assert!(!task.alarm_triggered);

    rollover_due_dates(&store, day(3)).await.unwrap();
    reset_daily_flags(&store).await.unwrap();
    let task = fetch(&store, walk).await;
    assert_eq!(task.due_time, at(3, 7, 0));
    assert!(!task.checked);
}

#[tokio::test]
async fn test_reset_clears_future_task_untouched_by_rollover() {
    let store = InMemoryTaskStore::new();
    let ids = seed(
        &store,
        vec![Task {
            checked: true,
            ..Task::new("tomorrow", at(4, 8, 0))
        }],
    )
    .await;

    let report = rollover_due_dates(&store, day(3)).await.unwrap();
    assert_eq!(report.examined, 0);
    assert!(fetch(&store, ids[0]).await.checked);

    reset_daily_flags(&store).await.unwrap();
    let task = fetch(&store, ids[0]).await;
    assert!(!task.checked);
    assert_eq!(task.due_time, at(4, 8, 0));
}

// == Failure Isolation ==

#[tokio::test]
async fn test_one_failed_write_does_not_abort_sweep() {
    let store = FaultyStore::default();
    let ids = seed(
        &store,
        vec![
            Task::new("a", at(2, 8, 0)),
            Task::new("b", at(2, 8, 30)),
            Task::new("c", at(2, 9, 0)),
        ],
    )
    .await;
    store.inject(ids[1], Fault::FailWrite);

    let report = sweep_overdue(&store, at(2, 12, 0)).await.unwrap();
    assert_eq!(report.examined, 3);
    assert_eq!(report.updated, 2);
    assert_eq!(report.failed, 1);

    assert!(fetch(&store, ids[0]).await.alarm_triggered);
    assert!(!fetch(&store, ids[1]).await.alarm_triggered);
    assert!(fetch(&store, ids[2]).await.alarm_triggered);

    // The failed record is picked up again on the next tick.
    let report = sweep_overdue(&store, at(2, 12, 1)).await.unwrap();
    assert_eq!(report.failed, 0);
    assert!(fetch(&store, ids[1]).await.alarm_triggered);
}

#[tokio::test]
async fn test_one_failed_write_does_not_abort_rollover() {
    let store = FaultyStore::default();
    let ids = seed(
        &store,
        vec![Task::new("a", at(1, 6, 0)), Task::new("b", at(1, 7, 0))],
    )
    .await;
    store.inject(ids[0], Fault::FailWrite);

    let report = rollover_due_dates(&store, day(2)).await.unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(fetch(&store, ids[0]).await.due_time, at(1, 6, 0));
    assert_eq!(fetch(&store, ids[1]).await.due_time, at(2, 7, 0));
}

#[tokio::test]
async fn test_read_failure_aborts_run() {
    let store = FaultyStore::default();
    let ids = seed(&store, vec![Task::new("a", at(1, 6, 0))]).await;
    store.fail_reads.store(true, Ordering::SeqCst);

    let result = sweep_overdue(&store, at(2, 12, 0)).await;
    assert!(matches!(result, Err(TaskError::StoreUnavailable(_))));

    let result = rollover_due_dates(&store, day(2)).await;
    assert!(matches!(result, Err(TaskError::StoreUnavailable(_))));

    let result = reset_daily_flags(&store).await;
    assert!(matches!(result, Err(TaskError::StoreUnavailable(_))));

    // Nothing was written.
    store.fail_reads.store(false, Ordering::SeqCst);
    assert_eq!(fetch(&store, ids[0]).await, {
        let mut expected = Task::new("a", at(1, 6, 0));
        expected.id = Some(ids[0]);
        expected
    });
}

#[tokio::test]
async fn test_runner_recovers_on_next_tick_after_read_failure() {
    let store = Arc::new(FaultyStore::default());
    let ids = seed(&*store, vec![Task::new("a", at(2, 6, 0))]).await;
    let runner = JobRunner::new(
        store.clone(),
        Arc::new(FixedClock::new(at(2, 12, 0))),
        Duration::from_secs(5),
    );

    store.fail_reads.store(true, Ordering::SeqCst);
    assert!(matches!(
        runner.run(JobKind::OverdueSweep).await,
        RunOutcome::Failed(TaskError::StoreUnavailable(_))
    ));

    store.fail_reads.store(false, Ordering::SeqCst);
    assert!(matches!(
        runner.run(JobKind::OverdueSweep).await,
        RunOutcome::Completed(_)
    ));
    assert!(fetch(&*store, ids[0]).await.alarm_triggered);

    let stats = runner.stats().await;
    assert_eq!(stats[&JobKind::OverdueSweep].failed, 1);
    assert_eq!(stats[&JobKind::OverdueSweep].completed, 1);
}

// == Concurrent User Edits ==

#[tokio::test]
async fn test_task_deleted_mid_sweep_is_skipped_not_resurrected() {
    let store = FaultyStore::default();
    let ids = seed(
        &store,
        vec![Task::new("gone", at(1, 6, 0)), Task::new("kept", at(1, 7, 0))],
    )
    .await;
    store.inject(ids[0], Fault::DeleteBeforeWrite);

    let report = reset_daily_flags(&store).await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 0);

    assert!(store.find_by_id(ids[0]).await.unwrap().is_none());
    assert_eq!(store.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_check_racing_sweep_is_last_writer_wins() {
    // No per-record locking: a check landing between the sweep's query and
    // its write is overwritten by the sweep's copy of the record.
    let store = FaultyStore::default();
    let ids = seed(&store, vec![Task::new("meds", at(2, 9, 0))]).await;
    store.inject(ids[0], Fault::CheckBeforeWrite);

    let report = sweep_overdue(&store, at(2, 9, 5)).await.unwrap();
    assert_eq!(report.updated, 1);

    let task = fetch(&store, ids[0]).await;
    assert!(task.alarm_triggered);
    assert!(!task.checked);
}
