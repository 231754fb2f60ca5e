//! Shared application state.

use impact_engine::Engine;
use sqlx::PgPool;

pub struct AppState {
  pub pool: PgPool,
  pub engine: Engine,
}
