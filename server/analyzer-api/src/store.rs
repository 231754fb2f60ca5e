//! All PostgreSQL access for the analyzer API.
//!
//! Uniqueness (coverage mapping identity, repository full_name) is enforced
//! by the store's constraints, not by application-level locking; conflicting
//! concurrent writes resolve through `ON CONFLICT DO NOTHING`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use impact_engine::types::AnalysisReport;

use crate::error::ApiError;
use crate::types::{CoverageMappingRequest, MetricsResponse, RepositoryRequest};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MappingRow {
  pub id: i64,
  pub file_path: String,
  pub test_file_path: String,
  pub test_function_name: String,
  pub coverage_percentage: f64,
  pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
  pub execution_time: f64,
  pub status: String,
  pub execution_date: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RepositoryRow {
  pub id: i64,
  pub name: String,
  pub owner: String,
  pub full_name: String,
  pub default_branch: String,
  pub language: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Apply schema.sql (idempotent).
pub async fn init_schema(pool: &PgPool) -> Result<(), ApiError> {
  sqlx::raw_sql(include_str!("../schema.sql")).execute(pool).await?;
  Ok(())
}

// ---------------------------------------------------------------------------
// Coverage index reads (snapshot prefetch for the engine)
// ---------------------------------------------------------------------------

pub async fn find_mappings(pool: &PgPool, file_path: &str) -> Result<Vec<MappingRow>, ApiError> {
  let rows = sqlx::query_as::<_, MappingRow>(
    r#"
    SELECT id, file_path, test_file_path, test_function_name, coverage_percentage, last_updated
    FROM coverage_mappings
    WHERE file_path = $1
    ORDER BY id
    "#,
  )
  .bind(file_path)
  .fetch_all(pool)
  .await?;
  Ok(rows)
}

pub async fn recent_history(
  pool: &PgPool,
  mapping_id: i64,
  limit: i64,
) -> Result<Vec<HistoryRow>, ApiError> {
  let rows = sqlx::query_as::<_, HistoryRow>(
    r#"
    SELECT execution_time, status, execution_date
    FROM test_history
    WHERE coverage_mapping_id = $1
    ORDER BY execution_date DESC
    LIMIT $2
    "#,
  )
  .bind(mapping_id)
  .bind(limit)
  .fetch_all(pool)
  .await?;
  Ok(rows)
}

/// Distinct test files across the whole store. Deliberately not scoped to
/// one repository; the engine treats it as the "total tests" denominator.
pub async fn distinct_test_file_count(pool: &PgPool) -> Result<i64, ApiError> {
  let count: (i64,) =
    sqlx::query_as("SELECT COUNT(DISTINCT test_file_path) FROM coverage_mappings")
      .fetch_one(pool)
      .await?;
  Ok(count.0)
}

// ---------------------------------------------------------------------------
// Coverage mapping CRUD
// ---------------------------------------------------------------------------

/// Insert a mapping; `None` means the (file, test file, test function)
/// identity already exists.
pub async fn create_mapping(
  pool: &PgPool,
  req: &CoverageMappingRequest,
) -> Result<Option<i64>, ApiError> {
  let row: Option<(i64,)> = sqlx::query_as(
    r#"
    INSERT INTO coverage_mappings (file_path, test_file_path, test_function_name, coverage_percentage)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (file_path, test_file_path, test_function_name) DO NOTHING
    RETURNING id
    "#,
  )
  .bind(&req.file_path)
  .bind(&req.test_file_path)
  .bind(&req.test_function_name)
  .bind(req.coverage_percentage)
  .fetch_optional(pool)
  .await?;
  Ok(row.map(|(id,)| id))
}

pub async fn list_mappings(
  pool: &PgPool,
  file_path: Option<&str>,
  test_file_path: Option<&str>,
) -> Result<Vec<MappingRow>, ApiError> {
  let rows = sqlx::query_as::<_, MappingRow>(
    r#"
    SELECT id, file_path, test_file_path, test_function_name, coverage_percentage, last_updated
    FROM coverage_mappings
    WHERE ($1::text IS NULL OR file_path = $1)
      AND ($2::text IS NULL OR test_file_path = $2)
    ORDER BY id
    "#,
  )
  .bind(file_path)
  .bind(test_file_path)
  .fetch_all(pool)
  .await?;
  Ok(rows)
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

/// Look up a repository by full name, lazily creating it on first analysis.
pub async fn get_or_create_repository(
  pool: &PgPool,
  full_name: &str,
) -> Result<RepositoryRow, ApiError> {
  if let Some(repo) = fetch_repository(pool, full_name).await? {
    return Ok(repo);
  }

  let (owner, name) = match full_name.split_once('/') {
    Some((owner, name)) => (owner, name),
    None => ("unknown", full_name),
  };

  // Racing creators resolve through the unique constraint; whoever loses
  // the insert re-reads the winner's row.
  sqlx::query(
    r#"
    INSERT INTO repositories (name, owner, full_name)
    VALUES ($1, $2, $3)
    ON CONFLICT (full_name) DO NOTHING
    "#,
  )
  .bind(name)
  .bind(owner)
  .bind(full_name)
  .execute(pool)
  .await?;

  fetch_repository(pool, full_name)
    .await?
    .ok_or_else(|| ApiError::Database(sqlx::Error::RowNotFound))
}

async fn fetch_repository(
  pool: &PgPool,
  full_name: &str,
) -> Result<Option<RepositoryRow>, ApiError> {
  let row = sqlx::query_as::<_, RepositoryRow>(
    r#"
    SELECT id, name, owner, full_name, default_branch, language, created_at
    FROM repositories
    WHERE full_name = $1
    "#,
  )
  .bind(full_name)
  .fetch_optional(pool)
  .await?;
  Ok(row)
}

/// Insert a repository; `None` means the full name is already registered.
pub async fn create_repository(
  pool: &PgPool,
  req: &RepositoryRequest,
) -> Result<Option<i64>, ApiError> {
  let full_name = format!("{}/{}", req.owner, req.name);
  let row: Option<(i64,)> = sqlx::query_as(
    r#"
    INSERT INTO repositories (name, owner, full_name, default_branch, language)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (full_name) DO NOTHING
    RETURNING id
    "#,
  )
  .bind(&req.name)
  .bind(&req.owner)
  .bind(&full_name)
  .bind(&req.default_branch)
  .bind(&req.language)
  .fetch_optional(pool)
  .await?;
  Ok(row.map(|(id,)| id))
}

pub async fn list_repositories(pool: &PgPool) -> Result<Vec<RepositoryRow>, ApiError> {
  let rows = sqlx::query_as::<_, RepositoryRow>(
    r#"
    SELECT id, name, owner, full_name, default_branch, language, created_at
    FROM repositories
    ORDER BY id
    "#,
  )
  .fetch_all(pool)
  .await?;
  Ok(rows)
}

// ---------------------------------------------------------------------------
// Analysis results
// ---------------------------------------------------------------------------

/// Persist one completed analysis together with the raw changed-file paths.
/// Write-once; nothing updates these rows afterwards.
pub async fn insert_analysis(
  pool: &PgPool,
  report: &AnalysisReport,
  changed_paths: &[String],
) -> Result<(), ApiError> {
  let changed_files = serde_json::to_value(changed_paths)
    .map_err(|e| ApiError::Engine(impact_engine::EngineError::Json(e)))?;
  let selected_tests = serde_json::to_value(&report.selected_tests)
    .map_err(|e| ApiError::Engine(impact_engine::EngineError::Json(e)))?;

  sqlx::query(
    r#"
    INSERT INTO analyzer_results (
      analysis_id, pull_request_id, repository, changed_files, selected_tests,
      estimated_time_saved, risk_score, confidence_score, analysis_reasoning,
      total_tests_in_repo, tests_selected_count, created_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    "#,
  )
  .bind(&report.analysis_id)
  .bind(&report.pull_request_id)
  .bind(&report.repository)
  .bind(changed_files)
  .bind(selected_tests)
  .bind(report.estimated_time_saved)
  .bind(report.risk_score)
  .bind(report.confidence_score)
  .bind(&report.analysis_reasoning)
  .bind(report.total_tests_in_repo as i32)
  .bind(report.tests_selected_count as i32)
  .bind(report.created_at)
  .execute(pool)
  .await?;
  Ok(())
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

pub async fn metrics(pool: &PgPool) -> Result<MetricsResponse, ApiError> {
  let total_analyses: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM analyzer_results")
    .fetch_one(pool)
    .await?;
  let total_repositories: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM repositories")
    .fetch_one(pool)
    .await?;
  let total_coverage_mappings: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM coverage_mappings")
    .fetch_one(pool)
    .await?;
  let averages: (f64, f64) = sqlx::query_as(
    r#"
    SELECT COALESCE(AVG(estimated_time_saved), 0.0), COALESCE(AVG(risk_score), 0.0)
    FROM analyzer_results
    "#,
  )
  .fetch_one(pool)
  .await?;

  Ok(MetricsResponse {
    total_analyses: total_analyses.0,
    total_repositories: total_repositories.0,
    total_coverage_mappings: total_coverage_mappings.0,
    average_time_saved: averages.0,
    average_risk_score: averages.1,
  })
}
