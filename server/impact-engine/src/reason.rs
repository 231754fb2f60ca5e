//! Human-readable justification for each selected test.

use crate::config::Config;
use crate::types::{ChangeKind, ChangedFile, CoverageMapping, TestHistory, TestStatus};

/// Build a semicolon-joined explanation for why one test was selected.
pub fn selection_reason(
  mapping: &CoverageMapping,
  changed_file: &ChangedFile,
  history: &[TestHistory],
  config: &Config,
) -> String {
  let mut reasons: Vec<String> = Vec::new();

  if mapping.coverage_percentage > 0.0 {
    reasons.push(format!(
      "File has {:.1}% test coverage",
      mapping.coverage_percentage
    ));
  }

  match changed_file.change_type {
    ChangeKind::Deleted => reasons.push("File was deleted - high risk".to_string()),
    ChangeKind::Modified => reasons.push("File was modified - needs validation".to_string()),
    ChangeKind::Added => {}
  }

  let recent_failures = history
    .iter()
    .take(config.failure_window)
    .filter(|h| h.status == TestStatus::Failed)
    .count();
  if recent_failures > 0 {
    reasons.push(format!("Test failed {} times recently", recent_failures));
  }

  if reasons.is_empty() {
    reasons.push("File is covered by this test".to_string());
  }

  reasons.join("; ")
}
