//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use chrono::NaiveTime;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Overdue sweep interval in seconds
    pub sweep_interval: u64,
    /// Local wall-clock time of the daily rollover
    pub rollover_at: NaiveTime,
    /// Local wall-clock time of the daily full reset
    pub reset_at: NaiveTime,
    /// Upper bound in seconds for a single job run
    pub job_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `SWEEP_INTERVAL_SECS` - Overdue sweep frequency in seconds (default: 60)
    /// - `ROLLOVER_AT` - Daily rollover time, `HH:MM` (default: 00:00)
    /// - `RESET_AT` - Daily full reset time, `HH:MM` (default: 04:00)
    /// - `JOB_TIMEOUT_SECS` - Per-run timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            sweep_interval: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            rollover_at: env::var("ROLLOVER_AT")
                .ok()
                .and_then(|v| parse_clock_time(&v))
                .unwrap_or(defaults.rollover_at),
            reset_at: env::var("RESET_AT")
                .ok()
                .and_then(|v| parse_clock_time(&v))
                .unwrap_or(defaults.reset_at),
            job_timeout: env::var("JOB_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.job_timeout),
        }
    }

    /// Interval between overdue sweeps.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    /// Maximum duration of a single job run.
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout)
    }

    /// Describes an inverted daily boundary order, if configured.
    ///
    /// The full reset is expected to run after the rollover on the same day.
    /// When it does not, stale due dates can sit with cleared flags until the
    /// next rollover; that is reported, not corrected.
    pub fn schedule_warning(&self) -> Option<String> {
        if self.reset_at <= self.rollover_at {
            Some(format!(
                "daily reset at {} does not run after rollover at {}",
                self.reset_at.format("%H:%M"),
                self.rollover_at.format("%H:%M")
            ))
        } else {
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            sweep_interval: 60,
            rollover_at: NaiveTime::default(),
            reset_at: NaiveTime::from_hms_opt(4, 0, 0).unwrap_or_default(),
            job_timeout: 30,
        }
    }
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}
