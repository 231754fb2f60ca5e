//! Priority classification from coverage and change kind.

use crate::config::Config;
use crate::types::{ChangeKind, Priority};

/// Assign a priority tier to a candidate test. First match wins:
/// deleted files are always high risk regardless of coverage, then coverage
/// thresholds decide.
pub fn classify(coverage_percentage: f64, change_type: ChangeKind, config: &Config) -> Priority {
  if change_type == ChangeKind::Deleted {
    return Priority::High;
  }
  if coverage_percentage >= config.high_coverage_threshold {
    Priority::High
  } else if coverage_percentage >= config.medium_coverage_threshold {
    Priority::Medium
  } else {
    Priority::Low
  }
}
