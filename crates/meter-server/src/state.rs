//! Shared application state.

use std::sync::Arc;

use meter_adapter_sqlite::SqliteStore;
use meter_auth::{CredentialService, CredentialStore};
use meter_core::AppConfig;

use crate::middleware::dashboard::DashboardAuth;
use crate::usage::UsageRecorder;

#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialService,
    pub usage: UsageRecorder,
    pub dashboard: Arc<DashboardAuth>,
}

impl AppState {
    /// Connect the credential store, run migrations, and wire the service,
    /// usage recorder, and dashboard gate.
    pub async fn init(cfg: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn CredentialStore> = Arc::new(SqliteStore::open(&cfg.database.path).await?);
        Ok(Self::assemble(
            store,
            DashboardAuth::new(cfg.dashboard.resolved()),
            cfg.usage.queue_depth,
        ))
    }

    /// Wire state over an arbitrary store; integration tests use this with
    /// an in-memory double.
    pub fn assemble(
        store: Arc<dyn CredentialStore>,
        dashboard: DashboardAuth,
        usage_queue_depth: usize,
    ) -> Self {
        Self {
            credentials: CredentialService::new(store.clone()),
            usage: UsageRecorder::spawn(store, usage_queue_depth),
            dashboard: Arc::new(dashboard),
        }
    }
}
