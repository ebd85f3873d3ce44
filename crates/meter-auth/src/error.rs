//! Error taxonomy for the credential core.

use thiserror::Error;

/// Why a credential failed to resolve.
///
/// Recorded for server-side logs only. Callers see a single undifferentiated
/// "invalid credential" outcome, so the API cannot be used as an oracle for
/// which of these occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// No row matches the fingerprint.
    NotFound,
    /// The credential has been revoked.
    Inactive,
    /// The credential's expiry instant has passed.
    Expired,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::NotFound => "credential not found",
            InvalidReason::Inactive => "credential revoked",
            InvalidReason::Expired => "credential expired",
        }
    }
}

/// Errors from issuance and validation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Issuance input: the human label was empty.
    #[error("credential name must not be empty")]
    EmptyName,

    /// Issuance input: no grants were requested.
    #[error("at least one grant is required")]
    EmptyGrants,

    /// Issuance input: a grant string is outside the fixed enumeration.
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    /// Issuance input: the expiration spec did not parse.
    #[error("invalid expiration spec: {0:?}")]
    InvalidExpiration(String),

    /// The OS secure-random source failed. Unretryable.
    #[error("secure random source unavailable: {0}")]
    RandomUnavailable(String),

    /// The submitted secret did not resolve to a usable credential.
    /// Missing, revoked, and expired rows all land here.
    #[error("invalid credential")]
    CredentialInvalid(InvalidReason),

    /// The persistence layer failed; classified separately from an invalid
    /// credential so operators can tell "store is down" from "token is bad".
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors surfaced by [`crate::store::CredentialStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store was unreachable or a query failed.
    #[error("store query failed: {0}")]
    Query(String),

    /// A persisted row could not be decoded (for example, a grants blob
    /// containing a capability string outside the enumeration). Such rows
    /// are rejected rather than passed through.
    #[error("stored credential {id} is corrupt: {detail}")]
    CorruptRecord { id: String, detail: String },
}
