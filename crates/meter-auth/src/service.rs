//! Credential lifecycle operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::capability::GrantSet;
use crate::credential::{Credential, NewCredential};
use crate::error::{AuthError, InvalidReason};
use crate::expiry;
use crate::store::CredentialStore;
use crate::token;

/// Input to an issuance operation, exactly as a caller supplied it.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub name: String,
    pub grants: Vec<String>,
    pub expires_in: Option<String>,
}

/// A freshly issued credential.
///
/// `secret` is the only copy of the plaintext that will ever exist; it is
/// shown to the caller once and only its fingerprint is persisted.
#[derive(Debug)]
pub struct IssuedCredential {
    pub secret: String,
    pub credential: Credential,
}

/// Issuance, validation, and revocation over a [`CredentialStore`].
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Issue a new credential.
    ///
    /// All input validation happens before any row is written; a bad name,
    /// grant list, or expiration spec leaves the store untouched.
    pub async fn issue(&self, request: IssueRequest) -> Result<IssuedCredential, AuthError> {
        self.issue_at(request, Utc::now()).await
    }

    pub async fn issue_at(
        &self,
        request: IssueRequest,
        now: DateTime<Utc>,
    ) -> Result<IssuedCredential, AuthError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AuthError::EmptyName);
        }
        if request.grants.is_empty() {
            return Err(AuthError::EmptyGrants);
        }
        let grants = GrantSet::parse(&request.grants)?;
        let expires_at = match request.expires_in.as_deref() {
            Some(spec) => expiry::resolve(spec, now)?,
            None => None,
        };

        let secret = token::generate()?;
        let record = NewCredential {
            fingerprint: token::fingerprint(&secret),
            name: name.to_string(),
            grants,
            created_at: now,
            expires_at,
        };
        let id = self.store.insert(&record).await?;

        tracing::info!(
            credential_id = %id,
            name = %record.name,
            grants = %record.grants,
            expires_at = ?record.expires_at,
            "credential issued"
        );

        Ok(IssuedCredential {
            secret,
            credential: Credential {
                id,
                fingerprint: record.fingerprint,
                name: record.name,
                grants: record.grants,
                created_at: record.created_at,
                last_used: None,
                expires_at: record.expires_at,
                active: true,
            },
        })
    }

    /// Resolve a submitted secret to a usable credential.
    ///
    /// Not-found, revoked, and expired rows all collapse into
    /// [`AuthError::CredentialInvalid`]; the distinction only reaches logs.
    /// Authorization always sees the grants actually persisted on the row.
    pub async fn authenticate(&self, secret: &str) -> Result<Credential, AuthError> {
        self.authenticate_at(secret, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        secret: &str,
        now: DateTime<Utc>,
    ) -> Result<Credential, AuthError> {
        let fingerprint = token::fingerprint(secret);
        let credential = self
            .store
            .find_by_fingerprint(&fingerprint)
            .await?
            .ok_or(AuthError::CredentialInvalid(InvalidReason::NotFound))?;

        if !credential.active {
            return Err(AuthError::CredentialInvalid(InvalidReason::Inactive));
        }
        if credential.expires_at.is_some_and(|at| at <= now) {
            return Err(AuthError::CredentialInvalid(InvalidReason::Expired));
        }
        Ok(credential)
    }

    /// Revoke a credential. Returns false when the id is unknown. Terminal:
    /// no operation exposed here reactivates a credential.
    pub async fn revoke(&self, id: Uuid) -> Result<bool, AuthError> {
        let revoked = self.store.revoke(id).await?;
        if revoked {
            tracing::info!(credential_id = %id, "credential revoked");
        }
        Ok(revoked)
    }

    /// Credential metadata, newest first.
    pub async fn list(&self) -> Result<Vec<Credential>, AuthError> {
        Ok(self.store.list().await?)
    }
}
