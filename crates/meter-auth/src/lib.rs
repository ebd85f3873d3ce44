//! Credential lifecycle and capability evaluation.
//!
//! This crate is the access-control core of the Meter analytics service:
//! opaque secret generation and fingerprinting, expiration specs, the fixed
//! capability enumeration, the persistence contract for credential rows, and
//! the service that ties issuance, validation, and revocation together.
//!
//! It is HTTP-agnostic; the server crate layers request extraction and
//! status-code mapping on top.

pub mod capability;
pub mod credential;
pub mod error;
pub mod expiry;
pub mod service;
pub mod store;
pub mod token;

pub use capability::{Capability, GrantSet};
pub use credential::{Credential, NewCredential};
pub use error::{AuthError, InvalidReason, StoreError};
pub use service::{CredentialService, IssueRequest, IssuedCredential};
pub use store::CredentialStore;
