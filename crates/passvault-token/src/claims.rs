//! Token claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoded identity carried by a token. Immutable once decoded.
///
/// Field names on the wire follow the identity service (`uid` for the
/// account id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Account identifier; must be positive.
    #[serde(rename = "uid")]
    pub account_id: i64,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub role: i32,

    /// Application that requested the token.
    #[serde(default)]
    pub app_id: i32,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,

    /// Unique token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl ClaimSet {
    /// Create claims expiring `ttl` from now, with a fresh `jti`.
    pub fn new(
        account_id: i64,
        email: impl Into<String>,
        role: i32,
        app_id: i32,
        ttl: Duration,
    ) -> Self {
        Self {
            account_id,
            email: email.into(),
            role,
            app_id,
            exp: (Utc::now() + ttl).timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Expiry as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token is expired at `now`. A token expiring this second is expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
