//! The fixed capability enumeration and grant evaluation.
//!
//! Capabilities are closed-world: a grant string outside this enumeration is
//! rejected at issuance, and an unmapped request target always evaluates to
//! deny, never to allow-by-default.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthError;

/// A named permission drawn from the fixed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// Read aggregated insight endpoints.
    #[serde(rename = "read:insights")]
    ReadInsights,
    /// Read service health endpoints.
    #[serde(rename = "read:health")]
    ReadHealth,
    /// Manage API credentials (the narrow admin grant).
    #[serde(rename = "manage:tokens")]
    ManageTokens,
    /// The universal override: satisfies every capability requirement.
    #[serde(rename = "admin:all")]
    AdminAll,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::ReadInsights,
        Capability::ReadHealth,
        Capability::ManageTokens,
        Capability::AdminAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ReadInsights => "read:insights",
            Capability::ReadHealth => "read:health",
            Capability::ManageTokens => "manage:tokens",
            Capability::AdminAll => "admin:all",
        }
    }

    /// Parse a wire string, rejecting anything outside the enumeration.
    pub fn parse(s: &str) -> Result<Self, AuthError> {
        match s {
            "read:insights" => Ok(Capability::ReadInsights),
            "read:health" => Ok(Capability::ReadHealth),
            "manage:tokens" => Ok(Capability::ManageTokens),
            "admin:all" => Ok(Capability::AdminAll),
            other => Err(AuthError::UnknownCapability(other.to_string())),
        }
    }

    /// The capability a request target demands, keyed by path prefix.
    /// Unmapped targets return `None`, which gates treat as deny.
    pub fn required_for_path(path: &str) -> Option<Capability> {
        if path.starts_with("/api/insights") {
            Some(Capability::ReadInsights)
        } else if path.starts_with("/api/health") {
            Some(Capability::ReadHealth)
        } else {
            None
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, de-duplicated set of granted capabilities.
///
/// Serializes as a plain JSON string array, which is also the persisted
/// representation; deserialization inherits the strict enumeration, so a
/// stored blob containing an unknown string fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantSet(Vec<Capability>);

impl GrantSet {
    /// Validate and collect grant strings. Fails on the first unknown
    /// capability and on an empty result.
    pub fn parse<I, S>(grants: I) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Vec::new();
        for grant in grants {
            let capability = Capability::parse(grant.as_ref().trim())?;
            if !set.contains(&capability) {
                set.push(capability);
            }
        }
        if set.is_empty() {
            return Err(AuthError::EmptyGrants);
        }
        Ok(Self(set))
    }

    /// Whether these grants satisfy a required capability, either directly
    /// or through the universal override.
    pub fn satisfies(&self, required: Capability) -> bool {
        self.0.contains(&required) || self.0.contains(&Capability::AdminAll)
    }

    /// The admin tier is a logical OR over the narrow token-management grant
    /// and the universal override.
    pub fn allows_admin(&self) -> bool {
        self.0.contains(&Capability::ManageTokens) || self.0.contains(&Capability::AdminAll)
    }

    pub fn as_slice(&self) -> &[Capability] {
        &self.0
    }
}

impl fmt::Display for GrantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, capability) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(capability.as_str())?;
        }
        Ok(())
    }
}
