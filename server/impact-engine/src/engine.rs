//! Engine facade: validate, select, score, summarize — one request/response
//! cycle per call. Stateless apart from reads through the coverage index;
//! persistence of the report belongs to the service layer.

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::EngineError;
use crate::index::CoverageIndex;
use crate::score;
use crate::select;
use crate::summary;
use crate::types::{AnalysisReport, AnalysisRequest};

pub struct Engine {
  config: Config,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  /// Run one impact analysis.
  ///
  /// Rejects an empty changed-file list before touching the index; any
  /// index read failure aborts the whole call uncommitted. Scoring inside
  /// never aborts (see `score`).
  pub fn analyze(
    &self,
    index: &dyn CoverageIndex,
    request: &AnalysisRequest,
  ) -> Result<AnalysisReport, EngineError> {
    if request.repository.is_empty() {
      return Err(EngineError::validation("repository", "must not be empty"));
    }
    if request.pull_request_id.is_empty() {
      return Err(EngineError::validation("pull_request_id", "must not be empty"));
    }
    if request.changed_files.is_empty() {
      return Err(EngineError::validation(
        "changed_files",
        "at least one changed file must be provided",
      ));
    }

    let selection = select::select_tests(index, &request.changed_files, &self.config)?;

    let risk_score = score::risk_score(&selection.tests, &request.changed_files);
    let confidence_score =
      score::confidence_score(&selection.tests, &request.changed_files, &self.config);
    let estimated_time_saved =
      score::time_saved_minutes(&selection.tests, selection.total_test_files, &self.config);
    let analysis_reasoning = summary::compose_reasoning(
      &selection.tests,
      &request.changed_files,
      risk_score,
      confidence_score,
      &self.config,
    );

    let tests_selected_count = selection.tests.len();
    Ok(AnalysisReport {
      analysis_id: Uuid::new_v4().to_string(),
      pull_request_id: request.pull_request_id.clone(),
      repository: request.repository.clone(),
      selected_tests: selection.tests,
      estimated_time_saved,
      risk_score,
      confidence_score,
      total_tests_in_repo: selection.total_test_files,
      tests_selected_count,
      analysis_reasoning,
      created_at: Utc::now(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::index::{SnapshotRow, StaticIndex};
  use crate::types::{ChangeKind, ChangedFile, CoverageMapping, Priority, TestHistory};

  fn request(paths: &[(&str, ChangeKind)]) -> AnalysisRequest {
    AnalysisRequest {
      repository: "acme/api".into(),
      pull_request_id: "42".into(),
      changed_files: paths
        .iter()
        .map(|(p, k)| ChangedFile {
          file_path: (*p).to_string(),
          change_type: *k,
          lines_changed: None,
        })
        .collect(),
      base_branch: "main".into(),
      head_branch: "feature/login".into(),
      commit_sha: None,
    }
  }

  #[test]
  fn empty_changed_files_rejected_before_index_reads() {
    struct PanickingIndex;
    impl CoverageIndex for PanickingIndex {
      fn find_mappings(&self, _: &str) -> Result<Vec<CoverageMapping>, EngineError> {
        panic!("index must not be touched");
      }
      fn recent_history(&self, _: i64, _: usize) -> Result<Vec<TestHistory>, EngineError> {
        panic!("index must not be touched");
      }
      fn distinct_test_file_count(&self) -> Result<i64, EngineError> {
        panic!("index must not be touched");
      }
    }

    let engine = Engine::with_defaults();
    let err = engine.analyze(&PanickingIndex, &request(&[])).unwrap_err();
    assert!(err.to_string().contains("changed_files"));
  }

  #[test]
  fn index_failure_aborts_the_call() {
    struct FailingIndex;
    impl CoverageIndex for FailingIndex {
      fn find_mappings(&self, _: &str) -> Result<Vec<CoverageMapping>, EngineError> {
        Err(EngineError::index("store unreachable"))
      }
      fn recent_history(&self, _: i64, _: usize) -> Result<Vec<TestHistory>, EngineError> {
        Err(EngineError::index("store unreachable"))
      }
      fn distinct_test_file_count(&self) -> Result<i64, EngineError> {
        Err(EngineError::index("store unreachable"))
      }
    }

    let engine = Engine::with_defaults();
    let err = engine
      .analyze(&FailingIndex, &request(&[("src/a.py", ChangeKind::Modified)]))
      .unwrap_err();
    assert!(matches!(err, EngineError::Index(_)));
  }

  #[test]
  fn no_matching_mappings_means_max_risk_zero_confidence() {
    let index = StaticIndex::from_rows(Vec::new(), 120);
    let engine = Engine::with_defaults();
    let report = engine
      .analyze(&index, &request(&[("src/a.py", ChangeKind::Modified)]))
      .unwrap();

    assert!(report.selected_tests.is_empty());
    assert_eq!(report.risk_score, 1.0);
    assert_eq!(report.confidence_score, 0.0);
    // Full baseline saved: 120 tests * 5s / 60.
    assert!((report.estimated_time_saved - 10.0).abs() < 1e-9);
    assert_eq!(report.total_tests_in_repo, 120);
  }

  #[test]
  fn modified_high_coverage_scenario() {
    let index = StaticIndex::from_rows(
      vec![SnapshotRow {
        file_path: "src/auth.py".into(),
        test_file_path: "tests/test_auth.py".into(),
        test_function_name: "test_login".into(),
        coverage_percentage: 90.0,
        history: Vec::new(),
      }],
      1,
    );
    let engine = Engine::with_defaults();
    let report = engine
      .analyze(&index, &request(&[("src/auth.py", ChangeKind::Modified)]))
      .unwrap();

    assert_eq!(report.tests_selected_count, 1);
    let test = &report.selected_tests[0];
    assert_eq!(test.priority, Priority::High);
    assert_eq!(test.estimated_execution_time, 5.0);
    assert!(test.reason.contains("90.0% test coverage"));
    assert!(test.reason.contains("modified"));
  }

  #[test]
  fn report_echoes_request_identity() {
    let index = StaticIndex::from_rows(Vec::new(), 0);
    let engine = Engine::with_defaults();
    let report = engine
      .analyze(&index, &request(&[("src/a.py", ChangeKind::Added)]))
      .unwrap();
    assert_eq!(report.repository, "acme/api");
    assert_eq!(report.pull_request_id, "42");
    assert!(!report.analysis_id.is_empty());
  }
}
