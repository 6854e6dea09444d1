//! Trakt API response types

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;

/// Token response from the OAuth token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
    /// Issue time as a Unix epoch, reported by the server
    pub created_at: i64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenGrant {
    /// Absolute expiry computed from the server-reported issue time, so the
    /// stored value does not drift with local clock skew
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.created_at, 0)
            .single()
            .map(|issued| issued + Duration::seconds(self.expires_in as i64))
    }
}

/// `users/settings` response
#[derive(Debug, Clone, Deserialize)]
pub struct UserSettings {
    pub user: Option<UserProfile>,
}

/// `user` object within the settings response
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vip: Option<bool>,
    #[serde(default)]
    pub private: Option<bool>,
}
