//! Product Service - catalog browsing

use std::sync::Arc;
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::CatalogPage;
use crate::query::{CatalogParams, CatalogQuery};
use crate::repository::ProductRepository;

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate raw parameters, then [`browse`](Self::browse).
    pub async fn browse_params(&self, params: CatalogParams) -> ProductResult<CatalogPage> {
        let query = CatalogQuery::try_from(params)?;
        self.browse(query).await
    }

    /// Fetch one page plus the count and collection-wide facets.
    ///
    /// The five reads are independent and run concurrently; the first
    /// failure fails the whole call.
    #[instrument(skip(self))]
    pub async fn browse(&self, query: CatalogQuery) -> ProductResult<CatalogPage> {
        let CatalogQuery {
            filter,
            sort,
            pagination,
        } = query;

        let (products, total, brands, categories, max_price) = tokio::try_join!(
            self.repository.find_page(filter.clone(), sort, pagination),
            self.repository.count(filter),
            self.repository.distinct_brands(),
            self.repository.distinct_categories(),
            self.repository.max_price(),
        )?;

        tracing::debug!(total, returned = products.len(), "Catalog page assembled");

        Ok(CatalogPage::new(
            total, pagination, products, brands, categories, max_price,
        ))
    }
}
