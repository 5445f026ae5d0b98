use std::any::Any;

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

use crate::errors::ApiError;
use crate::routes::{self, COMPOSITIONS_PATH};
use crate::versioning;

pub const DOCS_PATH: &str = "/docs";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Composition API",
        version = "1.0",
        description = "Catalog of food compositions with paging, sorting, free-text search and a random meal generator."
    ),
    tags((name = "compositions", description = "Food compositions"))
)]
struct ApiDoc;

/// Permissive CORS: any origin, method and header.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
}

fn catch_panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(panic_handler as fn(_) -> _)
}

fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::internal("Internal Server Error", Some(format!("handler panicked: {detail}")))
        .into_response()
}

/// Assemble the full application: API routes behind version negotiation,
/// the documentation UI, and the CORS, tracing and panic layers.
pub fn build_router(db: &DatabaseConnection) -> Router {
    let (api, apidocs) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest(COMPOSITIONS_PATH, routes::router(db))
        .split_for_parts();

    api.layer(middleware::from_fn(versioning::api_version))
        .merge(Scalar::with_url(DOCS_PATH, apidocs))
        .layer(catch_panic_layer())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
