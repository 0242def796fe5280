use std::{future::Future, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::drug::repo::seaorm::SeaOrmDrugRepository;

use crate::{errors::StartupError, routes, state::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect to the database, bootstrap the schema when asked to, and wire the
/// store into handler state.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState<SeaOrmDrugRepository>, StartupError> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.bootstrap_schema {
        models::db::ensure_schema(&db)
            .await
            .map_err(|e| StartupError::Any(e.into()))?;
        info!(event = "schema_ready", "drugs table and indexes ensured");
    }
    Ok(ServerState::new(Arc::new(SeaOrmDrugRepository::new(db))))
}

/// Build the app and serve until `shutdown` resolves.
pub async fn run(cfg: AppConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<(), StartupError> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    info!(%addr, "drug api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!("server stopped accepting connections");
    Ok(())
}
