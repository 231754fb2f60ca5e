//! Overall analysis reasoning text.

use crate::config::Config;
use crate::types::{ChangedFile, Priority, SelectedTest};

/// Render the sentence-joined summary for one completed analysis.
pub fn compose_reasoning(
  selected: &[SelectedTest],
  changed_files: &[ChangedFile],
  risk_score: f64,
  confidence_score: f64,
  config: &Config,
) -> String {
  let mut parts: Vec<String> = Vec::new();

  parts.push(format!("Analysis of {} changed files", changed_files.len()));
  parts.push(format!("Selected {} relevant tests", selected.len()));

  if !selected.is_empty() {
    let high_priority = selected
      .iter()
      .filter(|t| t.priority == Priority::High)
      .count();
    if high_priority > 0 {
      parts.push(format!("{} high-priority tests selected", high_priority));
    }
  }

  parts.push(format!("Risk score: {:.2} (0.0 = low, 1.0 = high)", risk_score));
  parts.push(format!(
    "Confidence: {:.2} (0.0 = low, 1.0 = high)",
    confidence_score
  ));

  if risk_score > config.high_risk_banner {
    parts.push("High risk detected - consider running more tests".to_string());
  } else if risk_score < config.low_risk_banner {
    parts.push("Low risk - selected tests should provide good coverage".to_string());
  }

  parts.join(". ")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::ChangeKind;

  fn changed(n: usize) -> Vec<ChangedFile> {
    (0..n)
      .map(|i| ChangedFile {
        file_path: format!("src/f{}.py", i),
        change_type: ChangeKind::Modified,
        lines_changed: None,
      })
      .collect()
  }

  fn test(priority: Priority) -> SelectedTest {
    SelectedTest {
      test_file_path: "tests/test_x.py".into(),
      test_function_name: "test_x".into(),
      coverage_percentage: 75.0,
      estimated_execution_time: 5.0,
      priority,
      reason: String::new(),
    }
  }

  #[test]
  fn counts_and_scores_present() {
    let config = Config::default();
    let selected = vec![test(Priority::High), test(Priority::Low)];
    let text = compose_reasoning(&selected, &changed(3), 0.5, 0.6, &config);
    assert!(text.contains("Analysis of 3 changed files"));
    assert!(text.contains("Selected 2 relevant tests"));
    assert!(text.contains("1 high-priority tests selected"));
    assert!(text.contains("Risk score: 0.50"));
    assert!(text.contains("Confidence: 0.60"));
  }

  #[test]
  fn high_risk_banner() {
    let config = Config::default();
    let text = compose_reasoning(&[], &changed(1), 0.9, 0.0, &config);
    assert!(text.contains("High risk detected"));
    assert!(!text.contains("high-priority tests selected"));
  }

  #[test]
  fn low_risk_banner() {
    let config = Config::default();
    let selected = vec![test(Priority::Low)];
    let text = compose_reasoning(&selected, &changed(1), 0.2, 0.8, &config);
    assert!(text.contains("Low risk - selected tests should provide good coverage"));
  }

  #[test]
  fn mid_band_has_no_banner() {
    let config = Config::default();
    for risk in [0.3, 0.5, 0.7] {
      let text = compose_reasoning(&[], &changed(1), risk, 0.5, &config);
      assert!(!text.contains("High risk detected"), "risk {}", risk);
      assert!(!text.contains("Low risk -"), "risk {}", risk);
    }
  }
}
