//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc},
    error::{Error, ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tracing::instrument;

use crate::error::UserResult;
use crate::models::RegisterUser;
use crate::repository::UserRepository;

pub const COLLECTION_NAME: &str = "users";

const DUPLICATE_KEY: i32 = 11000;

/// Users are schema-less beyond `email`, so the collection holds raw documents.
pub struct MongoUserRepository {
    collection: Collection<Document>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Document>(collection_name),
        }
    }

    /// Unique index on `email`; backs the one-user-per-email guarantee.
    pub async fn init_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }
}

/// Duplicate-key failures, as raised by a unique index during a racing upsert.
fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user))]
    async fn insert_if_absent(&self, user: RegisterUser) -> UserResult<Option<String>> {
        let record = user.to_document()?;

        let result = self
            .collection
            .update_one(doc! { "email": user.email.as_str() }, doc! { "$setOnInsert": record })
            .upsert(true)
            .await;

        match result {
            Ok(outcome) => Ok(outcome.upserted_id.map(id_to_string)),
            Err(e) if is_duplicate_key(&e) => {
                tracing::debug!("Concurrent registration lost the upsert race");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
