//! Shared test harness: an in-memory credential store with call counters,
//! plus router assembly over it.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use meter_auth::{Credential, CredentialStore, GrantSet, NewCredential, StoreError, token};
use meter_core::DashboardConfig;
use meter_server::middleware::dashboard::DashboardAuth;
use meter_server::routes;
use meter_server::state::AppState;

#[derive(Default)]
pub struct MockStore {
    pub rows: Mutex<Vec<Credential>>,
    pub lookups: AtomicUsize,
    pub fail_lookups: AtomicBool,
}

impl MockStore {
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Seed a row directly and hand back the matching plaintext secret.
    pub fn seed(
        &self,
        name: &str,
        grants: &[&str],
        active: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> (String, Uuid) {
        let secret = token::generate().unwrap();
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(Credential {
            id,
            fingerprint: token::fingerprint(&secret),
            name: name.to_string(),
            grants: GrantSet::parse(grants).unwrap(),
            created_at: Utc::now(),
            last_used: None,
            expires_at,
            active,
        });
        (secret, id)
    }

    pub fn last_used_of(&self, id: Uuid) -> Option<DateTime<Utc>> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.last_used)
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl CredentialStore for MockStore {
    async fn insert(&self, credential: &NewCredential) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(Credential {
            id,
            fingerprint: credential.fingerprint.clone(),
            name: credential.name.clone(),
            grants: credential.grants.clone(),
            created_at: credential.created_at,
            last_used: None,
            expires_at: credential.expires_at,
            active: true,
        });
        Ok(id)
    }

    async fn find_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<Credential>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::Query("store offline".into()));
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.fingerprint == fingerprint)
            .cloned())
    }

    async fn revoke(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                row.active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn touch_last_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|c| c.id == id) {
            row.last_used = Some(at);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Credential>, StoreError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

/// Router over the mock store with no dashboard credentials configured.
pub fn app(store: Arc<MockStore>) -> Router {
    app_with_dashboard(store, DashboardConfig::default())
}

pub fn app_with_dashboard(store: Arc<MockStore>, dashboard: DashboardConfig) -> Router {
    routes::router(AppState::assemble(store, DashboardAuth::new(dashboard), 16))
}
