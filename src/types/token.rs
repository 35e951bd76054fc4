use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bearer token. At most one row exists per account; the identifier is the
/// value clients present and is unique across all tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "accountId")]
    pub account_id: i64,
    pub identifier: Uuid,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl Token {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// True once less than `min_time_left` of the lifetime remains. A token
    /// inside this window is still accepted by verification but is replaced
    /// on the next authentication.
    pub fn in_refresh_window(&self, min_time_left: Duration, now: DateTime<Utc>) -> bool {
        self.expires_at - min_time_left <= now
    }
}

/// Stateless token construction: a fresh random identifier and an expiry
/// `lifetime` from now. Persistence is the caller's concern.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(lifetime: Duration) -> Self {
        Self { lifetime }
    }

    pub fn issue(&self, account_id: i64) -> Token {
        Token {
            account_id,
            identifier: Uuid::new_v4(),
            expires_at: Utc::now() + self.lifetime,
        }
    }
}
