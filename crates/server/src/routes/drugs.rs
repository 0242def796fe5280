use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::drug::{validate_batch, Drug, DrugPayload};
use service::drug::repository::DrugRepository;

use crate::{errors::JsonApiError, state::ServerState};

type ApiResult<T> = Result<T, JsonApiError>;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive name fragment
    pub name: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaxPriceQuery {
    /// Inclusive upper bound, decimal string
    #[param(value_type = String, example = "10.00")]
    pub price: Decimal,
}

#[utoipa::path(
    post, path = "/api/drugs", tag = "drugs",
    request_body = crate::openapi::DrugPayloadDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::DrugDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create<R: DrugRepository + 'static>(
    State(state): State<ServerState<R>>,
    WithRejection(Json(payload), _): WithRejection<Json<DrugPayload>, JsonApiError>,
) -> ApiResult<(StatusCode, Json<Drug>)> {
    let new = payload.into_new_drug()?;
    let drug = state.drugs.create_drug(new).await?;
    Ok((StatusCode::CREATED, Json(drug)))
}

#[utoipa::path(
    post, path = "/api/drugs/batch", tag = "drugs",
    request_body = [crate::openapi::DrugPayloadDoc],
    responses(
        (status = 201, description = "Created", body = [crate::openapi::DrugDoc]),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_batch<R: DrugRepository + 'static>(
    State(state): State<ServerState<R>>,
    WithRejection(Json(payloads), _): WithRejection<Json<Vec<DrugPayload>>, JsonApiError>,
) -> ApiResult<(StatusCode, Json<Vec<Drug>>)> {
    let batch = validate_batch(payloads)?;
    let drugs = state.drugs.create_drugs(batch).await?;
    Ok((StatusCode::CREATED, Json(drugs)))
}

#[utoipa::path(
    get, path = "/api/drugs/{uid}", tag = "drugs",
    params(("uid" = Uuid, Path, description = "Drug uid")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::DrugDoc),
        (status = 400, description = "Malformed uid", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_one<R: DrugRepository + 'static>(
    State(state): State<ServerState<R>>,
    WithRejection(Path(uid), _): WithRejection<Path<Uuid>, JsonApiError>,
) -> ApiResult<Json<Drug>> {
    state
        .drugs
        .get_drug_by_uid(uid)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("Drug"))
}

#[utoipa::path(
    get, path = "/api/drugs", tag = "drugs",
    responses((status = 200, description = "All drugs", body = [crate::openapi::DrugDoc]))
)]
pub async fn list<R: DrugRepository + 'static>(
    State(state): State<ServerState<R>>,
) -> ApiResult<Json<Vec<Drug>>> {
    let drugs = state.drugs.get_all_drugs().await?;
    info!(count = drugs.len(), "list drugs");
    Ok(Json(drugs))
}

#[utoipa::path(
    get, path = "/api/drugs/manufacturer/{manufacturer}", tag = "drugs",
    params(("manufacturer" = String, Path, description = "Exact manufacturer name")),
    responses((status = 200, description = "Matching drugs", body = [crate::openapi::DrugDoc]))
)]
pub async fn by_manufacturer<R: DrugRepository + 'static>(
    State(state): State<ServerState<R>>,
    WithRejection(Path(manufacturer), _): WithRejection<Path<String>, JsonApiError>,
) -> ApiResult<Json<Vec<Drug>>> {
    Ok(Json(state.drugs.get_drugs_by_manufacturer(&manufacturer).await?))
}

#[utoipa::path(
    get, path = "/api/drugs/search", tag = "drugs",
    params(SearchQuery),
    responses(
        (status = 200, description = "Drugs whose name contains the fragment", body = [crate::openapi::DrugDoc]),
        (status = 400, description = "Missing name", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn search<R: DrugRepository + 'static>(
    State(state): State<ServerState<R>>,
    WithRejection(Query(q), _): WithRejection<Query<SearchQuery>, JsonApiError>,
) -> ApiResult<Json<Vec<Drug>>> {
    Ok(Json(state.drugs.get_drugs_by_name(&q.name).await?))
}

#[utoipa::path(
    get, path = "/api/drugs/price/max", tag = "drugs",
    params(MaxPriceQuery),
    responses(
        (status = 200, description = "Drugs priced at or below the bound", body = [crate::openapi::DrugDoc]),
        (status = 400, description = "Missing or malformed price", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn by_max_price<R: DrugRepository + 'static>(
    State(state): State<ServerState<R>>,
    WithRejection(Query(q), _): WithRejection<Query<MaxPriceQuery>, JsonApiError>,
) -> ApiResult<Json<Vec<Drug>>> {
    Ok(Json(state.drugs.get_drugs_by_max_price(q.price).await?))
}

#[utoipa::path(
    put, path = "/api/drugs/{uid}", tag = "drugs",
    params(("uid" = Uuid, Path, description = "Drug uid")),
    request_body = crate::openapi::DrugPayloadDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::DrugDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update<R: DrugRepository + 'static>(
    State(state): State<ServerState<R>>,
    WithRejection(Path(uid), _): WithRejection<Path<Uuid>, JsonApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<DrugPayload>, JsonApiError>,
) -> ApiResult<Json<Drug>> {
    // a uid in the body is ignored; the path decides which record changes
    let fields = payload.validate()?;
    state
        .drugs
        .update_drug(uid, fields)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("Drug"))
}

#[utoipa::path(
    delete, path = "/api/drugs/{uid}", tag = "drugs",
    params(("uid" = Uuid, Path, description = "Drug uid")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete<R: DrugRepository + 'static>(
    State(state): State<ServerState<R>>,
    WithRejection(Path(uid), _): WithRejection<Path<Uuid>, JsonApiError>,
) -> ApiResult<StatusCode> {
    if state.drugs.delete_drug(uid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("Drug"))
    }
}
