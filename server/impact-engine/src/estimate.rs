//! Execution time estimation from historical runs.

use crate::config::Config;
use crate::types::TestHistory;

/// Estimate a test's execution time (seconds) from its history, newest first.
///
/// Averages the up-to-N most recent runs with strictly positive durations and
/// applies the safety buffer. No usable history falls back to the default.
/// Always returns a finite positive number.
pub fn estimate_execution_time(history: &[TestHistory], config: &Config) -> f64 {
  if history.is_empty() {
    return config.default_execution_seconds;
  }

  let recent: Vec<f64> = history
    .iter()
    .take(config.recent_runs_window)
    .map(|h| h.execution_time)
    .filter(|&t| t > 0.0)
    .collect();

  if recent.is_empty() {
    return config.default_execution_seconds;
  }

  let avg = recent.iter().sum::<f64>() / recent.len() as f64;
  avg * config.safety_buffer
}
