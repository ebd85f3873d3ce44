//! Runtime configuration.
//!
//! Values come from an optional TOML file (`METER_CONFIG`, or `./config.toml`
//! when unset). Every field has a serde default, so a bare binary starts with
//! a local SQLite file and no dashboard access. Operator credentials may also
//! be supplied via `METER_DASHBOARD_USERNAME` / `METER_DASHBOARD_PASSWORD`,
//! which take precedence over file values and are resolved once at startup.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Environment variable overriding the dashboard operator username.
pub const DASHBOARD_USERNAME_ENV: &str = "METER_DASHBOARD_USERNAME";

/// Environment variable overriding the dashboard operator password.
pub const DASHBOARD_PASSWORD_ENV: &str = "METER_DASHBOARD_PASSWORD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub usage: UsageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8082"
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:8082".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file holding credential rows.
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    "data/meter.sqlite".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Operator credentials for the dashboard gate.
///
/// Leaving either value unset disables dashboard access entirely; the gate
/// fails closed rather than comparing against an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl DashboardConfig {
    /// Apply environment overrides. Called once at startup; request handling
    /// only ever sees the resolved values.
    pub fn resolved(&self) -> DashboardConfig {
        self.with_overrides(
            env::var(DASHBOARD_USERNAME_ENV).ok(),
            env::var(DASHBOARD_PASSWORD_ENV).ok(),
        )
    }

    fn with_overrides(
        &self,
        username: Option<String>,
        password: Option<String>,
    ) -> DashboardConfig {
        DashboardConfig {
            username: non_empty(username).or_else(|| non_empty(self.username.clone())),
            password: non_empty(password).or_else(|| non_empty(self.password.clone())),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageConfig {
    /// Queue depth for the detached last-used recorder.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

fn default_queue_depth() -> usize {
    256
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            queue_depth: default_queue_depth(),
        }
    }
}

/// Load configuration from disk, falling back to defaults when no file exists.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = config_path();
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(&path)?;
    let cfg: AppConfig = toml::from_str(&raw)?;
    Ok(cfg)
}

fn config_path() -> PathBuf {
    if let Ok(p) = env::var("METER_CONFIG") {
        return PathBuf::from(p);
    }
    PathBuf::from("config.toml")
}
