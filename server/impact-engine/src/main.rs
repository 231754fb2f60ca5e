//! Binary entrypoint: read one JSON object from stdin, write one to stdout.
//!
//! Input: an analysis request plus an inline coverage snapshot (mapping rows
//! with history). Output: the analysis report. Lets the engine run as a
//! subprocess without a database.

use impact_engine::{Engine, SnapshotRow, StaticIndex};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::{self, Read, Write};

#[derive(Debug, Deserialize)]
struct AnalyzeInput {
  request: impact_engine::AnalysisRequest,
  #[serde(default)]
  coverage: Vec<SnapshotRow>,
  /// Global distinct test-file count; defaults to the distinct count within
  /// the supplied snapshot.
  #[serde(default)]
  total_test_files: Option<i64>,
}

fn main() {
  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "impact-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let input: AnalyzeInput = serde_json::from_str(&raw)?;

  let total = input.total_test_files.unwrap_or_else(|| {
    input
      .coverage
      .iter()
      .map(|r| r.test_file_path.as_str())
      .collect::<HashSet<_>>()
      .len() as i64
  });
  let index = StaticIndex::from_rows(input.coverage, total);

  let engine = Engine::with_defaults();
  let report = engine.analyze(&index, &input.request)?;

  let json = serde_json::to_vec(&report)?;
  io::stdout().write_all(&json)?;
  Ok(())
}
