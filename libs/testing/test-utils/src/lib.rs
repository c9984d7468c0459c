//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup
//! - `TestDataBuilder`: deterministic catalog and user fixtures
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!     let db = mongo.database(&builder.database_name());
//!
//!     db.collection::<mongodb::bson::Document>("products")
//!         .insert_many(builder.products(10))
//!         .await
//!         .unwrap();
//! }
//! ```

use mongodb::bson::{DateTime, Document, doc};

mod mongo;

pub use mongo::TestMongo;

pub const BRANDS: [&str; 3] = ["Acme", "Globex", "Initech"];
pub const CATEGORIES: [&str; 2] = ["shoes", "bags"];

/// First `createdAt` handed out by [`TestDataBuilder::product`] (2024-01-01T00:00:00Z).
const BASE_CREATED_AT_MS: i64 = 1_704_067_200_000;

/// Builder for test data with deterministic values
///
/// The same seed and index always give the same document.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the test name, so reruns see identical data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_browse_catalog");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Database name unique to this builder's seed.
    pub fn database_name(&self) -> String {
        format!("test_{}", self.seed)
    }

    /// Product document number `index`.
    ///
    /// Brands cycle through [`BRANDS`], categories through [`CATEGORIES`],
    /// prices are `10 * (index + 1)` and `createdAt` advances one minute per index.
    pub fn product(&self, index: usize) -> Document {
        doc! {
            "name": format!("Product {} {}", self.seed % 1000, index),
            "brand_name": BRANDS[index % BRANDS.len()],
            "category": CATEGORIES[index % CATEGORIES.len()],
            "price": 10.0 * (index as f64 + 1.0),
            "createdAt": DateTime::from_millis(BASE_CREATED_AT_MS + index as i64 * 60_000),
        }
    }

    pub fn products(&self, count: usize) -> Vec<Document> {
        (0..count).map(|index| self.product(index)).collect()
    }

    /// Unique email for testing, e.g. `test-42-main@example.com`.
    pub fn email(&self, suffix: &str) -> String {
        format!("test-{}-{}@example.com", self.seed, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.product(3), builder2.product(3));
        assert_eq!(builder1.email("main"), builder2.email("main"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.database_name(), builder2.database_name());
    }

    #[test]
    fn test_product_values() {
        let products = TestDataBuilder::new(7).products(4);

        assert_eq!(products.len(), 4);
        assert_eq!(products[0].get_str("brand_name").unwrap(), "Acme");
        assert_eq!(products[3].get_str("brand_name").unwrap(), "Acme");
        assert_eq!(products[1].get_str("category").unwrap(), "bags");
        assert_eq!(products[2].get_f64("price").unwrap(), 30.0);
    }
}
