use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::Product;
use crate::query::{Pagination, ProductFilter, SortSpec};

/// Read access to the product catalog.
///
/// Facet methods (`distinct_*`, `max_price`) ignore any filter and describe
/// the whole collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One sorted page of products matching `filter`
    async fn find_page(
        &self,
        filter: ProductFilter,
        sort: SortSpec,
        pagination: Pagination,
    ) -> ProductResult<Vec<Product>>;

    /// Number of products matching `filter`
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;

    /// Distinct non-null brand names, ascending
    async fn distinct_brands(&self) -> ProductResult<Vec<String>>;

    /// Distinct non-null categories, ascending
    async fn distinct_categories(&self) -> ProductResult<Vec<String>>;

    /// Highest price, or 0 for an empty collection
    async fn max_price(&self) -> ProductResult<f64>;
}
