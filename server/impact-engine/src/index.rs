//! Coverage index contract + an in-memory snapshot implementation.
//!
//! The engine never talks to a database directly. The service layer
//! prefetches coverage facts into a `StaticIndex` (or any other
//! `CoverageIndex` impl) and hands it to the engine, which keeps the core
//! pure and substitutable with fakes in tests.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::EngineError;
use crate::types::{CoverageMapping, TestHistory};

/// Read-only lookup surface the selector drives.
pub trait CoverageIndex {
  /// All known mappings for one source file path, in stored order.
  fn find_mappings(&self, file_path: &str) -> Result<Vec<CoverageMapping>, EngineError>;

  /// Up to `limit` history rows for one mapping, newest first.
  fn recent_history(&self, mapping_id: i64, limit: usize)
    -> Result<Vec<TestHistory>, EngineError>;

  /// Distinct test files known to the store. Computed globally, not scoped
  /// to one repository; used as the "total tests" denominator.
  fn distinct_test_file_count(&self) -> Result<i64, EngineError>;
}

/// One prefetched coverage fact with its history inlined, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotRow {
  pub file_path: String,
  pub test_file_path: String,
  pub test_function_name: String,
  #[serde(default)]
  pub coverage_percentage: f64,
  #[serde(default)]
  pub history: Vec<TestHistory>,
}

/// Immutable in-memory index built from snapshot rows. Mapping ids are
/// assigned sequentially at build time; lookup order matches insertion order.
#[derive(Debug, Default)]
pub struct StaticIndex {
  by_file: HashMap<String, Vec<CoverageMapping>>,
  history: HashMap<i64, Vec<TestHistory>>,
  total_test_files: i64,
}

impl StaticIndex {
  pub fn from_rows(rows: Vec<SnapshotRow>, total_test_files: i64) -> Self {
    let mut by_file: HashMap<String, Vec<CoverageMapping>> = HashMap::new();
    let mut history: HashMap<i64, Vec<TestHistory>> = HashMap::new();

    for (i, row) in rows.into_iter().enumerate() {
      let id = i as i64 + 1;
      let mut runs = row.history;
      runs.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
      history.insert(id, runs);
      by_file.entry(row.file_path.clone()).or_default().push(CoverageMapping {
        id,
        file_path: row.file_path,
        test_file_path: row.test_file_path,
        test_function_name: row.test_function_name,
        coverage_percentage: row.coverage_percentage,
      });
    }

    Self {
      by_file,
      history,
      total_test_files,
    }
  }
}

impl CoverageIndex for StaticIndex {
  fn find_mappings(&self, file_path: &str) -> Result<Vec<CoverageMapping>, EngineError> {
    Ok(self.by_file.get(file_path).cloned().unwrap_or_default())
  }

  fn recent_history(
    &self,
    mapping_id: i64,
    limit: usize,
  ) -> Result<Vec<TestHistory>, EngineError> {
    let runs = self.history.get(&mapping_id).cloned().unwrap_or_default();
    Ok(runs.into_iter().take(limit).collect())
  }

  fn distinct_test_file_count(&self) -> Result<i64, EngineError> {
    Ok(self.total_test_files)
  }
}
