use core_config::{AppInfo, FromEnv, app_info, cors::CorsConfig, server::ServerConfig};

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let app = app_info!();
        let mongodb = MongoConfig::from_env()?.with_app_name(app.name);
        let server = ServerConfig::from_env()?;
        let cors = CorsConfig::from_env()?;

        Ok(Self {
            app,
            mongodb,
            server,
            cors,
            environment,
        })
    }
}
