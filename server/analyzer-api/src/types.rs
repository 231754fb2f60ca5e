//! Request/response types for the API surface (beyond the engine contract).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CoverageMappingRequest {
  pub file_path: String,
  pub test_file_path: String,
  pub test_function_name: String,
  #[serde(default)]
  pub coverage_percentage: f64,
}

fn default_branch() -> String {
  "main".to_string()
}

#[derive(Debug, Deserialize)]
pub struct RepositoryRequest {
  pub name: String,
  pub owner: String,
  #[serde(default = "default_branch")]
  pub default_branch: String,
  #[serde(default)]
  pub language: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MappingFilter {
  #[serde(default)]
  pub file_path: Option<String>,
  #[serde(default)]
  pub test_file_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
  pub id: i64,
  pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub status: &'static str,
  pub timestamp: DateTime<Utc>,
  pub version: &'static str,
  pub database_status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
  pub total_analyses: i64,
  pub total_repositories: i64,
  pub total_coverage_mappings: i64,
  pub average_time_saved: f64,
  pub average_risk_score: f64,
}
