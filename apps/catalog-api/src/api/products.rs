//! Wires the products domain to HTTP routes.

use axum::Router;
use domain_products::{MongoProductRepository, ProductService, handlers};

use crate::state::AppState;

pub fn repository(state: &AppState) -> MongoProductRepository {
    MongoProductRepository::new(&state.db)
}

pub fn router(state: &AppState) -> Router {
    handlers::router(ProductService::new(repository(state)))
}
