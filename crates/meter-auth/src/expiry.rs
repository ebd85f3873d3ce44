//! Expiration spec parsing.

use chrono::{DateTime, Duration, Utc};

use crate::error::AuthError;

/// Resolve a human-readable expiration spec into an absolute instant.
///
/// `"30d"` counts 24-hour days and `"1y"` counts 365-day years; both are
/// deliberate approximations with no calendar arithmetic. Any other
/// non-empty spec is read as a general duration expression such as `"90m"`
/// or `"1h30m"`. A blank spec means the credential never expires.
///
/// A spec that matches none of these forms is an error; issuance refuses to
/// create the credential rather than silently defaulting to non-expiring.
pub fn resolve(spec: &str, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, AuthError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Ok(None);
    }

    let duration = if let Some(days) = spec.strip_suffix('d') {
        let d: u32 = days
            .parse()
            .map_err(|_| AuthError::InvalidExpiration(spec.to_string()))?;
        Duration::hours(i64::from(d) * 24)
    } else if let Some(years) = spec.strip_suffix('y') {
        let y: u32 = years
            .parse()
            .map_err(|_| AuthError::InvalidExpiration(spec.to_string()))?;
        Duration::days(i64::from(y) * 365)
    } else {
        let parsed = humantime::parse_duration(spec)
            .map_err(|_| AuthError::InvalidExpiration(spec.to_string()))?;
        Duration::from_std(parsed).map_err(|_| AuthError::InvalidExpiration(spec.to_string()))?
    };

    Ok(Some(now + duration))
}
