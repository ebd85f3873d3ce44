//! Opaque secret generation and fingerprinting.

use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Prefix carried by every issued secret, so tokens are recognizable in
/// support tooling and log excerpts without exposing any entropy.
pub const SECRET_PREFIX: &str = "meter_";

const SECRET_BYTES: usize = 32;

/// Generate a new opaque secret: 256 bits from the OS secure-random source,
/// hex-encoded behind [`SECRET_PREFIX`].
///
/// Failure means the random source itself is unavailable; callers should
/// treat that as fatal rather than retry.
pub fn generate() -> Result<String, AuthError> {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::RandomUnavailable(e.to_string()))?;
    Ok(format!("{SECRET_PREFIX}{}", hex::encode(bytes)))
}

/// SHA-256 hex digest of the full secret string, prefix included.
///
/// Deterministic and unsalted: the digest doubles as the storage lookup key,
/// and the 256 bits of entropy in the secret make dictionary attacks on the
/// unsalted digest impractical. Equality of fingerprints is the sole
/// criterion for matching a secret to a credential.
pub fn fingerprint(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}
