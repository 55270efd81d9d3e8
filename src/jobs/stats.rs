//! Job Statistics Module
//!
//! Tracks run outcomes and per-record results for each scheduled job.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::jobs::SweepReport;

// == Job Stats ==
/// Running totals for one job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    /// Runs that actually started
    pub runs: u64,
    /// Runs that finished, possibly with per-record failures
    pub completed: u64,
    /// Runs aborted by a store error
    pub failed: u64,
    /// Runs cut off by the job timeout
    pub timed_out: u64,
    /// Invocations dropped because the job was still running
    pub skipped: u64,
    /// Records written across all runs
    pub records_updated: u64,
    /// Record writes that failed across all runs
    pub record_failures: u64,
    /// Local start time of the most recent run
    pub last_run_at: Option<NaiveDateTime>,
    /// Short description of the most recent outcome
    pub last_outcome: Option<String>,
}

impl JobStats {
    // == Constructor ==
    /// Creates a new JobStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Start ==
    pub fn record_start(&mut self, at: NaiveDateTime) {
        self.runs += 1;
        self.last_run_at = Some(at);
    }

    // == Record Completion ==
    pub fn record_completed(&mut self, report: &SweepReport) {
        self.completed += 1;
        self.records_updated += report.updated as u64;
        self.record_failures += report.failed as u64;
        self.last_outcome = Some(format!(
            "completed: {} updated, {} skipped, {} failed",
            report.updated, report.skipped, report.failed
        ));
    }

    // == Record Failure ==
    pub fn record_failed(&mut self, error: &str) {
        self.failed += 1;
        self.last_outcome = Some(format!("failed: {}", error));
    }

    // == Record Timeout ==
    pub fn record_timed_out(&mut self) {
        self.timed_out += 1;
        self.last_outcome = Some("timed out".to_string());
    }

    // == Record Skip ==
    /// Overlap skips do not count as runs.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobKind;
    use chrono::NaiveDate;

    #[test]
    fn test_stats_new() {
        let stats = JobStats::new();
        assert_eq!(stats.runs, 0);
        assert!(stats.last_run_at.is_none());
        assert!(stats.last_outcome.is_none());
    }

    #[test]
    fn test_record_completed_accumulates() {
        let mut stats = JobStats::new();
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let report = SweepReport {
            job: JobKind::DailyRollover,
            examined: 4,
            updated: 3,
            skipped: 0,
            failed: 1,
        };

        stats.record_start(at);
        stats.record_completed(&report);
        stats.record_start(at);
        stats.record_completed(&report);

        assert_eq!(stats.runs, 2);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.records_updated, 6);
        assert_eq!(stats.record_failures, 2);
        assert_eq!(stats.last_run_at, Some(at));
    }

    #[test]
    fn test_failure_and_timeout_outcomes() {
        let mut stats = JobStats::new();

        stats.record_failed("store unavailable");
        assert_eq!(stats.last_outcome.as_deref(), Some("failed: store unavailable"));

        stats.record_timed_out();
        stats.record_skipped();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.timed_out, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.runs, 0);
        assert_eq!(stats.last_outcome.as_deref(), Some("timed out"));
    }
}
