//! Engine configuration with sane defaults.

/// Tunable constants for test selection and scoring. All weights are fixed
/// and hand-tuned; nothing here is learned.
#[derive(Debug, Clone)]
pub struct Config {
  /// Fallback execution time (seconds) for tests with no history.
  pub default_execution_seconds: f64,
  /// Multiplier applied to the historical average (20% safety buffer).
  pub safety_buffer: f64,
  /// Max history rows fetched per mapping.
  pub history_limit: usize,
  /// Most-recent runs considered when averaging execution time.
  pub recent_runs_window: usize,
  /// Most-recent runs considered when counting failures for the reason text.
  pub failure_window: usize,
  /// Hard cap on the selected-test list, applied after sorting.
  pub max_selected_tests: usize,
  /// Coverage % at or above which a test is high priority.
  pub high_coverage_threshold: f64,
  /// Coverage % at or above which a test is medium priority.
  pub medium_coverage_threshold: f64,
  /// Flat per-test cost (seconds) assumed for the "run everything" baseline.
  pub baseline_seconds_per_test: f64,
  /// Selected-test count at which test-count confidence saturates.
  pub test_count_saturation: f64,
  /// Changed-file count above which a change counts as sprawling.
  pub sprawling_change_threshold: usize,
  /// File-change confidence assigned to sprawling changes.
  pub sprawling_confidence: f64,
  /// Confidence blend weights (coverage / test count / file count).
  pub coverage_weight: f64,
  pub test_count_weight: f64,
  pub file_change_weight: f64,
  /// Risk score above which the summary warns.
  pub high_risk_banner: f64,
  /// Risk score below which the summary reassures.
  pub low_risk_banner: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      default_execution_seconds: 5.0,
      safety_buffer: 1.2,
      history_limit: 10,
      recent_runs_window: 5,
      failure_window: 3,
      max_selected_tests: 50,
      high_coverage_threshold: 80.0,
      medium_coverage_threshold: 50.0,
      baseline_seconds_per_test: 5.0,
      test_count_saturation: 20.0,
      sprawling_change_threshold: 10,
      sprawling_confidence: 0.8,
      coverage_weight: 0.5,
      test_count_weight: 0.3,
      file_change_weight: 0.2,
      high_risk_banner: 0.7,
      low_risk_banner: 0.3,
    }
  }
}
