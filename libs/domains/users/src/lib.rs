//! Users Domain
//!
//! Registration only: `POST /users` stores a user document unless one with
//! the same email already exists. Uniqueness is enforced by MongoDB (unique
//! index + upsert-if-absent), so concurrent duplicates cannot both insert.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{MongoUserRepository, UserService, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let repository = MongoUserRepository::new(&client.database("catalog"));
//! repository.init_indexes().await?;
//!
//! let router = axum::Router::new().nest("/users", handlers::router(UserService::new(repository)));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{ALREADY_EXISTS_MESSAGE, RegisterUser, RegistrationOutcome};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
