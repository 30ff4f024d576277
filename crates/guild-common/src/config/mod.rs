//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AuctionConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, ServerConfig, SnowflakeConfig, SweepConfig,
};
