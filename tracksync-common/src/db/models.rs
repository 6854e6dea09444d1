//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A locally registered user of the media library
///
/// `username` is the remote (Trakt) identity and is only set after a
/// successful end-to-end authorization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub guid: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// New unauthorized account
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            guid: Uuid::new_v4().to_string(),
            username: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

/// One OAuth authorization grant bound to an account
///
/// `code` is the PIN last used to obtain the tokens. Token fields are
/// overwritten in place on re-authorization; rows are never implicitly
/// deleted. The oldest row per account is the current credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthCredential {
    pub guid: String,
    pub account_guid: String,
    pub code: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OAuthCredential {
    /// New empty credential bound to an account; token fields are filled in
    /// by the authorization flow before the row is first persisted.
    pub fn new(account_guid: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            guid: Uuid::new_v4().to_string(),
            account_guid: account_guid.into(),
            code: String::new(),
            access_token: String::new(),
            refresh_token: String::new(),
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Key-value settings row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
