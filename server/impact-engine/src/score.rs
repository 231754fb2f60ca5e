//! Risk, confidence, and time-saved scoring over the selected tests.
//!
//! Scorers fail open: a non-finite intermediate degrades to a neutral 0.5
//! instead of aborting the analysis. This is deliberately the opposite of
//! the orchestrator's abort-on-first-failure policy; a degraded score is
//! safer for CI than a blocked pipeline.

use crate::config::Config;
use crate::types::{ChangedFile, SelectedTest};

/// Clamp to [0,1]; non-finite values degrade to the neutral midpoint.
fn clamp_score(score: f64) -> f64 {
  if score.is_finite() {
    score.clamp(0.0, 1.0)
  } else {
    0.5
  }
}

/// Aggregate risk of trusting the selected subset instead of the full suite.
///
/// No selection at all is the riskiest outcome (1.0). Otherwise the average
/// priority weight and the average coverage deficit are blended half-and-half
/// so neither factor alone saturates the score.
pub fn risk_score(selected: &[SelectedTest], _changed_files: &[ChangedFile]) -> f64 {
  if selected.is_empty() {
    return 1.0;
  }

  let count = selected.len() as f64;
  let avg_priority = selected.iter().map(|t| t.priority.weight()).sum::<f64>() / count;
  let avg_coverage = selected.iter().map(|t| t.coverage_percentage).sum::<f64>() / count;
  let coverage_deficit = 1.0 - avg_coverage / 100.0;

  clamp_score((avg_priority + coverage_deficit) / 2.0)
}

/// How reliable the selection itself is believed to be.
///
/// Weighted blend of average coverage, selection size (diminishing returns
/// past the saturation point), and change sprawl.
pub fn confidence_score(
  selected: &[SelectedTest],
  changed_files: &[ChangedFile],
  config: &Config,
) -> f64 {
  if selected.is_empty() {
    return 0.0;
  }

  let count = selected.len() as f64;
  let coverage_confidence =
    selected.iter().map(|t| t.coverage_percentage).sum::<f64>() / count / 100.0;
  let test_count_confidence = (count / config.test_count_saturation).min(1.0);
  let file_change_confidence = if changed_files.len() <= config.sprawling_change_threshold {
    1.0
  } else {
    config.sprawling_confidence
  };

  clamp_score(
    coverage_confidence * config.coverage_weight
      + test_count_confidence * config.test_count_weight
      + file_change_confidence * config.file_change_weight,
  )
}

/// Minutes saved versus a flat per-test baseline for "run everything".
pub fn time_saved_minutes(selected: &[SelectedTest], total_test_count: i64, config: &Config) -> f64 {
  if total_test_count <= 0 {
    return 0.0;
  }

  let selected_seconds: f64 = selected.iter().map(|t| t.estimated_execution_time).sum();
  let full_suite_seconds = total_test_count as f64 * config.baseline_seconds_per_test;

  (full_suite_seconds - selected_seconds).max(0.0) / 60.0
}
