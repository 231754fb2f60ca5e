//! Impact Analyzer API
//!
//! HTTP service around the impact engine: prefetches coverage facts from
//! PostgreSQL, drives the engine, persists analysis results, and exposes
//! coverage-mapping/repository CRUD plus health and metrics.
//! Bind to 127.0.0.1 by default (internal only).

pub mod error;
pub mod handlers;
pub mod state;
pub mod store;
pub mod types;

pub use error::ApiError;
pub use state::AppState;
