pub mod config;

pub use config::{
    AppConfig, DashboardConfig, DatabaseConfig, ServerConfig, UsageConfig, load_config,
};
