//! The persisted credential model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::capability::GrantSet;

/// A persisted API credential, resolved into the caller's principal on every
/// protected request.
///
/// The raw secret is never part of this type: only its fingerprint is
/// stored, and the fingerprint itself is excluded from serialization so it
/// cannot leak through listing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Credential {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub fingerprint: String,
    pub name: String,
    pub grants: GrantSet,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl Credential {
    /// Whether this credential may authorize a request at `now`.
    ///
    /// Evaluated on every validation call; usability is never cached across
    /// requests. `last_used` plays no part in the decision.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.is_none_or(|at| at > now)
    }
}

/// The row an issuance operation asks the store to persist.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub fingerprint: String,
    pub name: String,
    pub grants: GrantSet,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
