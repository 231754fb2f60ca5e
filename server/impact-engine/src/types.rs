//! Core types for the impact engine (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Change kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
  Added,
  Modified,
  Deleted,
}

impl ChangeKind {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "added" | "add" => Some(Self::Added),
      "modified" | "changed" => Some(Self::Modified),
      "deleted" | "removed" => Some(Self::Deleted),
      _ => None,
    }
  }
}

/// One changed file entry in an incoming analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
  pub file_path: String,
  pub change_type: ChangeKind,
  #[serde(default)]
  pub lines_changed: Option<u32>,
}

// ---------------------------------------------------------------------------
// Coverage facts (what the index returns)
// ---------------------------------------------------------------------------

/// A stored fact that a test function exercises a source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageMapping {
  pub id: i64,
  pub file_path: String,
  pub test_file_path: String,
  pub test_function_name: String,
  /// Stored as 0-100; normalized to a fraction wherever combined with scores.
  pub coverage_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
  Passed,
  Failed,
  Skipped,
}

impl TestStatus {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "passed" | "pass" => Some(Self::Passed),
      "failed" | "fail" => Some(Self::Failed),
      "skipped" | "skip" => Some(Self::Skipped),
      _ => None,
    }
  }
}

/// One past execution of a test, newest-first when returned by the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestHistory {
  /// Duration in seconds.
  pub execution_time: f64,
  pub status: TestStatus,
  pub executed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Priority tiers
// ---------------------------------------------------------------------------

/// Coarse urgency classification driving both ranking and risk weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  High,
  Medium,
  Low,
}

impl Priority {
  /// Fixed numeric weight for aggregation. Hand-tuned, not learned.
  pub fn weight(self) -> f64 {
    match self {
      Self::High => 0.8,
      Self::Medium => 0.5,
      Self::Low => 0.2,
    }
  }
}

// ---------------------------------------------------------------------------
// Derived candidate (transient, embedded in the final report)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedTest {
  pub test_file_path: String,
  pub test_function_name: String,
  pub coverage_percentage: f64,
  /// Seconds, always finite and non-negative.
  pub estimated_execution_time: f64,
  pub priority: Priority,
  pub reason: String,
}

// ---------------------------------------------------------------------------
// Request / report (JSON contract with the service layer)
// ---------------------------------------------------------------------------

fn default_base_branch() -> String {
  "main".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
  /// Repository name ("owner/repo").
  pub repository: String,
  pub pull_request_id: String,
  pub changed_files: Vec<ChangedFile>,
  #[serde(default = "default_base_branch")]
  pub base_branch: String,
  pub head_branch: String,
  #[serde(default)]
  pub commit_sha: Option<String>,
}

/// The result of one analysis call. Write-once; the service layer persists
/// it verbatim and never mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
  pub analysis_id: String,
  pub pull_request_id: String,
  pub repository: String,
  pub selected_tests: Vec<SelectedTest>,
  /// Minutes, >= 0.
  pub estimated_time_saved: f64,
  /// 0.0 = low risk, 1.0 = high risk.
  pub risk_score: f64,
  /// 0.0 = low confidence, 1.0 = high confidence.
  pub confidence_score: f64,
  pub total_tests_in_repo: i64,
  pub tests_selected_count: usize,
  pub analysis_reasoning: String,
  pub created_at: DateTime<Utc>,
}
