//! Binary entrypoint for the analyzer API.

use axum::{routing::get, routing::post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use analyzer_api::{handlers, store, AppState};
use impact_engine::Engine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let subscriber = FmtSubscriber::builder()
    .with_max_level(Level::INFO)
    .finish();
  tracing::subscriber::set_global_default(subscriber)?;

  let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
  let port: u16 = std::env::var("PORT")
    .unwrap_or_else(|_| "5006".into())
    .parse()
    .expect("PORT must be a valid u16");

  let pool = sqlx::PgPool::connect(&database_url).await?;
  store::init_schema(&pool).await?;

  let state = Arc::new(AppState {
    pool,
    engine: Engine::with_defaults(),
  });

  let app = Router::new()
    .route("/health", get(handlers::health))
    .route("/analyze", post(handlers::analyze))
    .route(
      "/coverage-mappings",
      post(handlers::create_coverage_mapping).get(handlers::get_coverage_mappings),
    )
    .route(
      "/repositories",
      post(handlers::create_repository).get(handlers::get_repositories),
    )
    .route("/metrics", get(handlers::metrics))
    .layer(CorsLayer::permissive())
    .with_state(state);

  let addr = SocketAddr::from(([127, 0, 0, 1], port));
  info!("analyzer-api listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
