//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{bson_as_f64, Product};
use crate::query::{Pagination, ProductFilter, SortSpec};
use crate::repository::ProductRepository;

pub const COLLECTION_NAME: &str = "products";

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Indexes backing the exact-match filters and both sort keys.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = |keys: Document, name: &str| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        let indexes = vec![
            index(doc! { "brand_name": 1 }, "idx_brand_name"),
            index(doc! { "category": 1 }, "idx_category"),
            index(doc! { "price": 1 }, "idx_price"),
            index(doc! { "createdAt": -1 }, "idx_created_at"),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Conjunction of the provided predicates; an empty filter matches everything.
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref search) = filter.search {
            doc.insert(
                "name",
                doc! { "$regex": regex::escape(search), "$options": "i" },
            );
        }

        if let Some(ref brand) = filter.brand {
            doc.insert("brand_name", brand.as_str());
        }

        if let Some(ref category) = filter.category {
            doc.insert("category", category.as_str());
        }

        if let Some(range) = filter.price_range {
            doc.insert("price", doc! { "$gte": range.min, "$lte": range.max });
        }

        doc
    }

    /// `_id` breaks ties so equal sort keys page deterministically.
    fn sort_document(sort: &SortSpec) -> Document {
        let key = sort.key();
        doc! { key: sort.direction.as_i32(), "_id": 1 }
    }

    async fn distinct_strings(&self, field: &str) -> ProductResult<Vec<String>> {
        let pipeline = vec![
            doc! { "$match": { field: { "$type": "string" } } },
            doc! { "$group": { "_id": format!("${}", field) } },
            doc! { "$sort": { "_id": 1 } },
        ];

        let values: Vec<Document> = self
            .collection
            .clone_with_type::<Document>()
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        Ok(values
            .into_iter()
            .filter_map(|group| group.get_str("_id").ok().map(str::to_owned))
            .collect())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn find_page(
        &self,
        filter: ProductFilter,
        sort: SortSpec,
        pagination: Pagination,
    ) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .sort(Self::sort_document(&sort))
            .skip(pagination.skip())
            .limit(i64::try_from(pagination.limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn distinct_brands(&self) -> ProductResult<Vec<String>> {
        self.distinct_strings("brand_name").await
    }

    #[instrument(skip(self))]
    async fn distinct_categories(&self) -> ProductResult<Vec<String>> {
        self.distinct_strings("category").await
    }

    #[instrument(skip(self))]
    async fn max_price(&self) -> ProductResult<f64> {
        let pipeline = vec![
            doc! { "$match": { "price": { "$type": "number" } } },
            doc! { "$group": { "_id": Bson::Null, "max": { "$max": "$price" } } },
        ];

        let mut cursor = self
            .collection
            .clone_with_type::<Document>()
            .aggregate(pipeline)
            .await?;

        let max = cursor
            .try_next()
            .await?
            .and_then(|group| group.get("max").and_then(bson_as_f64))
            .unwrap_or(0.0);

        Ok(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PriceRange, SortField};

    #[test]
    fn test_build_filter_empty() {
        let doc = MongoProductRepository::build_filter(&ProductFilter::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_search_is_escaped_and_case_insensitive() {
        let filter = ProductFilter {
            search: Some("usb-c (2m)".to_string()),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        let name = doc.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"usb\-c \(2m\)");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_build_filter_combines_predicates() {
        let filter = ProductFilter {
            search: None,
            brand: Some("Acme".to_string()),
            category: Some("shoes".to_string()),
            price_range: Some(PriceRange { min: 10.0, max: 50.0 }),
        };
        let doc = MongoProductRepository::build_filter(&filter);

        assert_eq!(doc.get_str("brand_name").unwrap(), "Acme");
        assert_eq!(doc.get_str("category").unwrap(), "shoes");
        let price = doc.get_document("price").unwrap();
        assert_eq!(price.get_f64("$gte").unwrap(), 10.0);
        assert_eq!(price.get_f64("$lte").unwrap(), 50.0);
        assert!(!doc.contains_key("name"));
    }

    #[test]
    fn test_sort_document() {
        let by_price = MongoProductRepository::sort_document(&SortSpec::new(SortField::Price, "asc"));
        assert_eq!(by_price, doc! { "price": 1, "_id": 1 });

        let newest = MongoProductRepository::sort_document(&SortSpec::default());
        assert_eq!(newest, doc! { "createdAt": -1, "_id": 1 });
    }
}
