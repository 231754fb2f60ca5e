//! Test selection: gather candidates per changed file, dedupe, rank, cap.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::Config;
use crate::error::EngineError;
use crate::estimate;
use crate::index::CoverageIndex;
use crate::priority;
use crate::reason;
use crate::types::{ChangedFile, SelectedTest};

/// The ranked, capped selection plus the global test-file denominator.
#[derive(Debug, Clone)]
pub struct Selection {
  pub tests: Vec<SelectedTest>,
  pub total_test_files: i64,
}

/// Drive the coverage index across all changed files, in request order.
///
/// Dedupe is keyed by test_file_path only: once one test function from a
/// file is recorded, further mappings sharing that test file are skipped.
/// This bounds output size and avoids re-listing a test file per function.
/// After accumulation the list is stable-sorted descending by
/// (priority weight, coverage) and truncated to the configured cap, so ties
/// beyond that preserve encounter order. Index read failures propagate.
pub fn select_tests(
  index: &dyn CoverageIndex,
  changed_files: &[ChangedFile],
  config: &Config,
) -> Result<Selection, EngineError> {
  let total_test_files = index.distinct_test_file_count()?;

  let mut selected: Vec<SelectedTest> = Vec::new();
  let mut seen_test_files: HashSet<String> = HashSet::new();

  for changed_file in changed_files {
    let mappings = index.find_mappings(&changed_file.file_path)?;
    for mapping in mappings {
      if seen_test_files.contains(&mapping.test_file_path) {
        continue;
      }

      let history = index.recent_history(mapping.id, config.history_limit)?;
      let estimated_time = estimate::estimate_execution_time(&history, config);
      let priority =
        priority::classify(mapping.coverage_percentage, changed_file.change_type, config);
      let reason = reason::selection_reason(&mapping, changed_file, &history, config);

      seen_test_files.insert(mapping.test_file_path.clone());
      selected.push(SelectedTest {
        test_file_path: mapping.test_file_path,
        test_function_name: mapping.test_function_name,
        coverage_percentage: mapping.coverage_percentage,
        estimated_execution_time: estimated_time,
        priority,
        reason,
      });
    }
  }

  // Stable sort: priority weight dominates, coverage breaks ties, encounter
  // order survives beyond that.
  selected.sort_by(|a, b| {
    b.priority
      .weight()
      .partial_cmp(&a.priority.weight())
      .unwrap_or(Ordering::Equal)
      .then_with(|| {
        b.coverage_percentage
          .partial_cmp(&a.coverage_percentage)
          .unwrap_or(Ordering::Equal)
      })
  });

  // Cap after sorting: low-ranked tests silently drop once the cap is hit.
  selected.truncate(config.max_selected_tests);

  Ok(Selection {
    tests: selected,
    total_test_files,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::index::{SnapshotRow, StaticIndex};
  use crate::types::{ChangeKind, Priority};

  fn changed(path: &str, kind: ChangeKind) -> ChangedFile {
    ChangedFile {
      file_path: path.into(),
      change_type: kind,
      lines_changed: None,
    }
  }

  fn row(file: &str, test_file: &str, function: &str, coverage: f64) -> SnapshotRow {
    SnapshotRow {
      file_path: file.into(),
      test_file_path: test_file.into(),
      test_function_name: function.into(),
      coverage_percentage: coverage,
      history: Vec::new(),
    }
  }

  #[test]
  fn dedupe_is_keyed_by_test_file_path_only() {
    let index = StaticIndex::from_rows(
      vec![
        row("src/a.py", "tests/test_a.py", "test_one", 60.0),
        row("src/a.py", "tests/test_a.py", "test_two", 90.0),
        row("src/b.py", "tests/test_a.py", "test_three", 30.0),
      ],
      1,
    );
    let files = vec![
      changed("src/a.py", ChangeKind::Modified),
      changed("src/b.py", ChangeKind::Modified),
    ];
    let selection = select_tests(&index, &files, &Config::default()).unwrap();

    // First occurrence wins; later functions in the same test file skip.
    assert_eq!(selection.tests.len(), 1);
    assert_eq!(selection.tests[0].test_function_name, "test_one");
  }

  #[test]
  fn sorted_by_priority_then_coverage() {
    let index = StaticIndex::from_rows(
      vec![
        row("src/a.py", "tests/test_low.py", "test_low", 20.0),
        row("src/a.py", "tests/test_high.py", "test_high", 85.0),
        row("src/a.py", "tests/test_mid_hi.py", "test_mid_hi", 70.0),
        row("src/a.py", "tests/test_mid_lo.py", "test_mid_lo", 55.0),
      ],
      4,
    );
    let files = vec![changed("src/a.py", ChangeKind::Modified)];
    let selection = select_tests(&index, &files, &Config::default()).unwrap();

    let order: Vec<&str> = selection
      .tests
      .iter()
      .map(|t| t.test_file_path.as_str())
      .collect();
    assert_eq!(
      order,
      vec![
        "tests/test_high.py",
        "tests/test_mid_hi.py",
        "tests/test_mid_lo.py",
        "tests/test_low.py"
      ]
    );
  }

  #[test]
  fn ties_preserve_encounter_order() {
    let index = StaticIndex::from_rows(
      vec![
        row("src/a.py", "tests/test_first.py", "test_a", 60.0),
        row("src/a.py", "tests/test_second.py", "test_b", 60.0),
      ],
      2,
    );
    let files = vec![changed("src/a.py", ChangeKind::Modified)];
    let selection = select_tests(&index, &files, &Config::default()).unwrap();
    assert_eq!(selection.tests[0].test_file_path, "tests/test_first.py");
    assert_eq!(selection.tests[1].test_file_path, "tests/test_second.py");
  }

  #[test]
  fn cap_applies_after_sorting() {
    // 60 candidates with ascending coverage; the 50 kept must be the
    // highest-coverage ones, not the first 50 encountered.
    let rows: Vec<SnapshotRow> = (0..60)
      .map(|i| {
        row(
          "src/a.py",
          &format!("tests/test_{:02}.py", i),
          "test_case",
          i as f64,
        )
      })
      .collect();
    let index = StaticIndex::from_rows(rows, 60);
    let files = vec![changed("src/a.py", ChangeKind::Modified)];
    let selection = select_tests(&index, &files, &Config::default()).unwrap();

    assert_eq!(selection.tests.len(), 50);
    assert_eq!(selection.tests[0].coverage_percentage, 59.0);
    let min = selection
      .tests
      .iter()
      .map(|t| t.coverage_percentage)
      .fold(f64::INFINITY, f64::min);
    assert_eq!(min, 10.0);
  }

  #[test]
  fn deleted_file_candidates_rank_high() {
    let index = StaticIndex::from_rows(
      vec![
        row("src/keep.py", "tests/test_keep.py", "test_keep", 70.0),
        row("src/gone.py", "tests/test_gone.py", "test_gone", 10.0),
      ],
      2,
    );
    let files = vec![
      changed("src/keep.py", ChangeKind::Modified),
      changed("src/gone.py", ChangeKind::Deleted),
    ];
    let selection = select_tests(&index, &files, &Config::default()).unwrap();
    assert_eq!(selection.tests[0].test_file_path, "tests/test_gone.py");
    assert_eq!(selection.tests[0].priority, Priority::High);
  }

  #[test]
  fn returns_global_test_file_count() {
    let index = StaticIndex::from_rows(Vec::new(), 123);
    let files = vec![changed("src/a.py", ChangeKind::Modified)];
    let selection = select_tests(&index, &files, &Config::default()).unwrap();
    assert!(selection.tests.is_empty());
    assert_eq!(selection.total_test_files, 123);
  }
}
