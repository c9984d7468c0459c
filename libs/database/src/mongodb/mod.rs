//! MongoDB connection management

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{MongoError, client_options, connect_from_config, connect_from_config_with_retry};
pub use health::ping;

pub use mongodb::{Client, Collection, Database};
