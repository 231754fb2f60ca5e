//! Impact Analysis Engine — deterministic test selection for CI (V1).
//!
//! Maps changed files to historically-associated tests, estimates each
//! test's cost from history, assigns priority tiers, ranks and caps the
//! selection, and aggregates risk/confidence scores with a human-readable
//! justification.
//!
//! No AI, no DB, no network; pure computation over a `CoverageIndex`.

pub mod config;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod index;
pub mod priority;
pub mod reason;
pub mod score;
pub mod select;
pub mod summary;
pub mod types;

pub use config::Config;
pub use engine::Engine;
pub use error::EngineError;
pub use index::{CoverageIndex, SnapshotRow, StaticIndex};
pub use types::{AnalysisReport, AnalysisRequest, ChangedFile, SelectedTest};
