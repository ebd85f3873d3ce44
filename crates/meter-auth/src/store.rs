//! Storage contract for persisted credentials.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::credential::{Credential, NewCredential};
use crate::error::StoreError;

/// The narrow persistence contract the credential core depends on.
///
/// Implementations own the row format; the core only ever addresses rows by
/// fingerprint or id and never mutates anything but `active` and
/// `last_used`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a credential row, returning its assigned id.
    async fn insert(&self, credential: &NewCredential) -> Result<Uuid, StoreError>;

    /// Look up a credential by secret fingerprint.
    async fn find_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<Credential>, StoreError>;

    /// Mark a credential inactive. Returns false when no row matched.
    /// There is no inverse operation.
    async fn revoke(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Record the instant a credential was last used. Best-effort; callers
    /// never depend on it for authorization.
    async fn touch_last_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// All credentials, newest first.
    async fn list(&self) -> Result<Vec<Credential>, StoreError>;
}
