//! Products Domain
//!
//! Read-only product catalog backed by MongoDB: paginated listing with
//! search, brand/category/price filters, sorting and collection-wide facets.
//!
//! ```text
//! Handlers  → parse query string, render JSON
//! Service   → validate CatalogParams, run page/count/facet queries concurrently
//! Repository→ trait + MongoDB implementation
//! Models    → Product, CatalogPage; query types in `query`
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let router = axum::Router::new().nest("/products", handlers::router(ProductService::new(repository)));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{CatalogPage, Product};
pub use mongodb::MongoProductRepository;
pub use query::{
    CatalogParams, CatalogQuery, Pagination, PriceRange, ProductFilter, SortDirection, SortField,
    SortSpec,
};
pub use repository::ProductRepository;
pub use service::ProductService;
