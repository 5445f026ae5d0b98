use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header::LOCATION},
};
use hyper::HeaderMap;
use sea_orm::DatabaseConnection;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::entity::{Composition, CompositionCreate, CompositionUpdate};
use crate::errors::ApiError;
use crate::pagination::pagination_headers;
use crate::query::QueryParameters;
use crate::store::CompositionStore;

pub const COMPOSITIONS_PATH: &str = "/api/compositions";
pub const TAG: &str = "compositions";

fn not_found(id: i32) -> ApiError {
    ApiError::not_found("Composition", Some(id.to_string()))
}

/// List compositions, one page at a time.
#[utoipa::path(
    get,
    path = "/",
    tag = TAG,
    params(QueryParameters),
    responses(
        (status = axum::http::StatusCode::OK, description = "One page of compositions", body = [Composition],
            headers(
                ("Content-Range" = String, description = "Returned range, e.g. `compositions 0-9/42`"),
                ("X-Pagination" = String, description = "JSON paging metadata")
            )
        ),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Invalid sort field or paging"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    )
)]
pub async fn get_all(
    Query(params): Query<QueryParameters>,
    State(db): State<DatabaseConnection>,
) -> Result<(HeaderMap, Json<Vec<Composition>>), ApiError> {
    let store = CompositionStore::new(&db);
    let items = store.get_all(&params).await?;
    let total_count = store.count_matching(&params).await?;
    let headers = pagination_headers(&params, total_count, Composition::RESOURCE_NAME_PLURAL);
    Ok((headers, Json(items)))
}

/// Get one composition by id.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Composition id")),
    responses(
        (status = axum::http::StatusCode::OK, description = "The requested composition", body = Composition),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Composition not found"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    )
)]
pub async fn get_one(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<Composition>, ApiError> {
    CompositionStore::new(&db)
        .get_single(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Create a composition.
#[utoipa::path(
    post,
    path = "/",
    tag = TAG,
    request_body = CompositionCreate,
    responses(
        (status = axum::http::StatusCode::CREATED, description = "Composition created", body = Composition),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    )
)]
pub async fn create_one(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CompositionCreate>,
) -> Result<(StatusCode, HeaderMap, Json<Composition>), ApiError> {
    let mut store = CompositionStore::new(&db);
    store.add(payload)?;
    let report = store.save().await?;
    let created = report.persisted.into_iter().next().ok_or_else(|| {
        ApiError::internal(
            "Error adding composition",
            Some("save reported no persisted row".to_string()),
        )
    })?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("{COMPOSITIONS_PATH}/{}", created.id)) {
        headers.insert(LOCATION, location);
    }
    tracing::info!(id = created.id, "created composition");
    Ok((StatusCode::CREATED, headers, Json(created)))
}

/// Replace a composition.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Composition id")),
    request_body = CompositionUpdate,
    responses(
        (status = axum::http::StatusCode::OK, description = "Composition updated", body = Composition),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Composition not found"),
        (status = axum::http::StatusCode::CONFLICT, description = "Body id differs from path id"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    )
)]
pub async fn update_one(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<CompositionUpdate>,
) -> Result<Json<Composition>, ApiError> {
    let mut store = CompositionStore::new(&db);
    let staged = store.update(id, payload).await?;
    let report = store.save().await?;
    Ok(Json(report.persisted.into_iter().next().unwrap_or(staged)))
}

/// Delete a composition.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Composition id")),
    responses(
        (status = axum::http::StatusCode::NO_CONTENT, description = "Composition deleted"),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Composition not found"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    )
)]
pub async fn delete_one(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut store = CompositionStore::new(&db);
    store.delete(id).await?;
    store.save().await?;
    tracing::info!(id, "deleted composition");
    Ok(StatusCode::NO_CONTENT)
}

/// A random meal: one starter, one main and one dessert.
#[utoipa::path(
    get,
    path = "/random-meal",
    tag = TAG,
    responses(
        (status = axum::http::StatusCode::OK, description = "Starter, main and dessert, in that order", body = [Composition]),
        (status = axum::http::StatusCode::NOT_FOUND, description = "A course has no compositions"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    )
)]
pub async fn random_meal(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<Composition>>, ApiError> {
    let meal = CompositionStore::new(&db).get_random_meal().await?;
    Ok(Json(meal))
}

/// Routes of the compositions resource, to be nested under [`COMPOSITIONS_PATH`].
pub fn router(db: &DatabaseConnection) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_all, create_one))
        .routes(routes!(random_meal))
        .routes(routes!(get_one, update_one, delete_one))
        .with_state(db.clone())
}
