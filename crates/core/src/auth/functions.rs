use chrono::{DateTime, Duration, Utc};

use super::{AuthError, Result};

/// Parses a compact duration such as `"12h"`, `"30m"`, `"7d"` or `"3600"`.
///
/// A bare number is read as seconds. Supported units are `s`, `m`, `h` and
/// `d`. Zero and negative durations are rejected.
///
/// ```
/// use finbook_core::auth::parse_duration;
/// use chrono::Duration;
///
/// assert_eq!(parse_duration("12h").unwrap(), Duration::hours(12));
/// assert_eq!(parse_duration("90").unwrap(), Duration::seconds(90));
/// assert!(parse_duration("soon").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration> {
    let invalid = || AuthError::InvalidDuration(input.to_string());
    let trimmed = input.trim();

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let amount: i64 = digits.parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }

    let duration = match unit {
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    };
    duration.ok_or_else(invalid)
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Result<&str> {
    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("expected Bearer scheme".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Calculate token expiry from issue time and TTL.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    issued_at + ttl
}

/// Check if a token expiry (seconds since epoch) has passed.
pub fn is_token_expired(exp: i64, now: DateTime<Utc>) -> bool {
    exp <= now.timestamp()
}
