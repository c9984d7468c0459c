//! HTTP handlers for the product catalog

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{BadRequestResponse, InternalServerErrorResponse},
    QueryParams,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{CatalogPage, Product};
use crate::query::CatalogParams;
use crate::repository::ProductRepository;
use crate::service::ProductService;

#[derive(OpenApi)]
#[openapi(
    paths(list_products),
    components(
        schemas(CatalogPage, Product),
        responses(BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Products", description = "Product catalog browsing")
    )
)]
pub struct ApiDoc;

/// Catalog routes, relative to where the router is nested.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products))
        .with_state(shared_service)
}

/// List products with search, filters, sorting, pagination and facets
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(CatalogParams),
    responses(
        (status = 200, description = "One page of products with facets", body = CatalogPage),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    QueryParams(params): QueryParams<CatalogParams>,
) -> ProductResult<Json<CatalogPage>> {
    let page = service.browse_params(params).await?;
    Ok(Json(page))
}
