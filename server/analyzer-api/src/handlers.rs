//! HTTP handlers for the analyzer API.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

use impact_engine::types::{AnalysisReport, AnalysisRequest, TestStatus};
use impact_engine::{SnapshotRow, StaticIndex};

use crate::error::ApiError;
use crate::store;
use crate::types::{
  CoverageMappingRequest, CreatedResponse, HealthResponse, MappingFilter, MetricsResponse,
  RepositoryRequest,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const HISTORY_LIMIT: i64 = 10;

/// POST /analyze — run one impact analysis and persist the result.
pub async fn analyze(
  State(state): State<Arc<crate::AppState>>,
  Json(request): Json<AnalysisRequest>,
) -> Result<(StatusCode, Json<AnalysisReport>), ApiError> {
  info!(
    "analysis request: repository={} pull_request_id={} files={}",
    request.repository,
    request.pull_request_id,
    request.changed_files.len()
  );

  // Reject before any store read; the engine re-checks the same invariant.
  if request.changed_files.is_empty() {
    return Err(ApiError::InvalidRequest(
      "at least one changed file must be provided".to_string(),
    ));
  }

  store::get_or_create_repository(&state.pool, &request.repository).await?;

  let index = build_snapshot(&state.pool, &request).await?;
  let report = state.engine.analyze(&index, &request)?;

  let changed_paths: Vec<String> = request
    .changed_files
    .iter()
    .map(|f| f.file_path.clone())
    .collect();
  store::insert_analysis(&state.pool, &report, &changed_paths).await?;

  info!(
    "analysis completed: analysis_id={} tests_selected={} time_saved={:.1}",
    report.analysis_id, report.tests_selected_count, report.estimated_time_saved
  );

  Ok((StatusCode::CREATED, Json(report)))
}

/// Prefetch the coverage facts one analysis needs into an in-memory index.
/// Mapping and history order is preserved so the engine sees the same
/// encounter order the store returned.
async fn build_snapshot(
  pool: &sqlx::PgPool,
  request: &AnalysisRequest,
) -> Result<StaticIndex, ApiError> {
  let mut rows: Vec<SnapshotRow> = Vec::new();
  let mut seen_paths: HashSet<&str> = HashSet::new();

  for changed_file in &request.changed_files {
    if !seen_paths.insert(changed_file.file_path.as_str()) {
      continue;
    }
    for mapping in store::find_mappings(pool, &changed_file.file_path).await? {
      let history = store::recent_history(pool, mapping.id, HISTORY_LIMIT)
        .await?
        .into_iter()
        .map(|h| impact_engine::types::TestHistory {
          execution_time: h.execution_time,
          status: TestStatus::from_str_loose(&h.status).unwrap_or(TestStatus::Skipped),
          executed_at: h.execution_date,
        })
        .collect();
      rows.push(SnapshotRow {
        file_path: mapping.file_path,
        test_file_path: mapping.test_file_path,
        test_function_name: mapping.test_function_name,
        coverage_percentage: mapping.coverage_percentage,
        history,
      });
    }
  }

  let total = store::distinct_test_file_count(pool).await?;
  Ok(StaticIndex::from_rows(rows, total))
}

/// POST /coverage-mappings
pub async fn create_coverage_mapping(
  State(state): State<Arc<crate::AppState>>,
  Json(request): Json<CoverageMappingRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
  match store::create_mapping(&state.pool, &request).await? {
    Some(id) => {
      info!(
        "created coverage mapping: file={} test={}",
        request.file_path, request.test_file_path
      );
      Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
          id,
          message: "Coverage mapping created successfully",
        }),
      ))
    }
    None => Err(ApiError::Conflict("coverage mapping already exists".to_string())),
  }
}

/// GET /coverage-mappings?file_path=&test_file_path=
pub async fn get_coverage_mappings(
  State(state): State<Arc<crate::AppState>>,
  Query(filter): Query<MappingFilter>,
) -> Result<Json<Vec<store::MappingRow>>, ApiError> {
  let rows = store::list_mappings(
    &state.pool,
    filter.file_path.as_deref(),
    filter.test_file_path.as_deref(),
  )
  .await?;
  Ok(Json(rows))
}

/// POST /repositories
pub async fn create_repository(
  State(state): State<Arc<crate::AppState>>,
  Json(request): Json<RepositoryRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
  match store::create_repository(&state.pool, &request).await? {
    Some(id) => {
      info!("created repository: {}/{}", request.owner, request.name);
      Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
          id,
          message: "Repository created successfully",
        }),
      ))
    }
    None => Err(ApiError::Conflict("repository already exists".to_string())),
  }
}

/// GET /repositories
pub async fn get_repositories(
  State(state): State<Arc<crate::AppState>>,
) -> Result<Json<Vec<store::RepositoryRow>>, ApiError> {
  let rows = store::list_repositories(&state.pool).await?;
  Ok(Json(rows))
}

/// GET /health
pub async fn health(
  State(state): State<Arc<crate::AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
  let database_status = match sqlx::query("SELECT 1").execute(&state.pool).await {
    Ok(_) => "healthy",
    Err(_) => "unreachable",
  };
  Ok(Json(HealthResponse {
    status: "healthy",
    timestamp: Utc::now(),
    version: VERSION,
    database_status,
  }))
}

/// GET /metrics
pub async fn metrics(
  State(state): State<Arc<crate::AppState>>,
) -> Result<Json<MetricsResponse>, ApiError> {
  Ok(Json(store::metrics(&state.pool).await?))
}
