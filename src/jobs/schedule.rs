//! Job Schedules
//!
//! When a job should run: on a fixed interval or daily at a local wall-clock time.

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};

use crate::clock::Clock;

/// How often a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Every `Duration`, starting immediately.
    Interval(Duration),
    /// Once a day at a local time.
    DailyAt(NaiveTime),
}

/// Longest single sleep while waiting for a daily boundary.
///
/// The wait re-reads the wall clock after each sleep, so a day that is not
/// 24 hours long (DST shifts) or a clock step still lands on the local time.
pub const DAILY_POLL: Duration = Duration::from_secs(60);

impl Schedule {
    /// The next local occurrence of `at` strictly after `now`.
    ///
    /// When `now` is exactly `at`, the next occurrence is tomorrow.
    pub fn next_daily(now: NaiveDateTime, at: NaiveTime) -> Option<NaiveDateTime> {
        let today = now.date().and_time(at);
        if now < today {
            Some(today)
        } else {
            now.date().succ_opt().map(|tomorrow| tomorrow.and_time(at))
        }
    }
}

/// Sleeps until `clock` reads at or after `target`.
///
/// Sleeps at most `poll` at a time and re-reads the clock in between, so the
/// wait follows local wall-clock time rather than elapsed time. A target
/// skipped by a forward jump (spring-forward gap) is reached on the first
/// read past it.
pub async fn sleep_until_local(clock: &dyn Clock, target: NaiveDateTime, poll: Duration) {
    loop {
        let remaining = match (target - clock.now()).to_std() {
            Ok(remaining) if !remaining.is_zero() => remaining,
            _ => return,
        };
        tokio::time::sleep(remaining.min(poll)).await;
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interval(every) => write!(f, "every {}s", every.as_secs()),
            Self::DailyAt(at) => write!(f, "daily at {}", at.format("%H:%M")),
        }
    }
}
