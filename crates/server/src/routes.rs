use axum::{middleware, routing::get, routing::post, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::{metrics, types::Health};
use service::drug::repository::DrugRepository;

use crate::{openapi::ApiDoc, state::ServerState};

pub mod drugs;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: drug API, health, metrics and docs.
pub fn build_router<R: DrugRepository + 'static>(state: ServerState<R>, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/drugs", get(drugs::list::<R>).post(drugs::create::<R>))
        .route("/api/drugs/batch", post(drugs::create_batch::<R>))
        .route("/api/drugs/search", get(drugs::search::<R>))
        .route("/api/drugs/price/max", get(drugs::by_max_price::<R>))
        .route("/api/drugs/manufacturer/:manufacturer", get(drugs::by_manufacturer::<R>))
        .route(
            "/api/drugs/:uid",
            get(drugs::get_one::<R>)
                .put(drugs::update::<R>)
                .delete(drugs::delete::<R>),
        )
        .with_state(state);

    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    api.merge(ops)
        .layer(middleware::from_fn(metrics::track_http))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
