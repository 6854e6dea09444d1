//! PIN-based account authorization
//!
//! A user obtains a short-lived PIN from Trakt and submits it through the
//! API. [`CredentialAuthorizer`] exchanges the PIN for OAuth tokens,
//! validates them against the identity endpoint, and only then persists the
//! credential and the account's remote username. A failed attempt leaves
//! both exactly as they were; the user simply resubmits a PIN.

use chrono::Utc;
use tracing::{debug, info, warn};

use tracksync_common::db::models::{Account, OAuthCredential};
use tracksync_common::Result;

use crate::trakt::{TokenGrant, TraktError, UserSettings};

/// Persistence for accounts and their credentials
#[allow(async_fn_in_trait)]
pub trait AccountStore {
    /// The account's current credential (oldest row), if any
    async fn current_credential(&self, account: &Account) -> Result<Option<OAuthCredential>>;

    async fn save_credential(&self, credential: &OAuthCredential) -> Result<()>;

    async fn save_account(&self, account: &Account) -> Result<()>;
}

/// PIN to access/refresh token exchange
#[allow(async_fn_in_trait)]
pub trait TokenExchange {
    async fn exchange_pin(&self, pin: &str) -> std::result::Result<TokenGrant, TraktError>;
}

/// Authenticated lookup of the remote user's profile
///
/// The access token is an explicit parameter: the credential under
/// validation has not been persisted yet and must not leak into any shared
/// client state.
#[allow(async_fn_in_trait)]
pub trait IdentityApi {
    async fn user_settings(
        &self,
        access_token: &str,
    ) -> std::result::Result<Option<UserSettings>, TraktError>;
}

/// Runs the authorization flow against a store, a token exchange and an
/// identity endpoint
pub struct CredentialAuthorizer<S, T, I> {
    store: S,
    exchange: T,
    identity: I,
}

impl<S, T, I> CredentialAuthorizer<S, T, I>
where
    S: AccountStore,
    T: TokenExchange,
    I: IdentityApi,
{
    pub fn new(store: S, exchange: T, identity: I) -> Self {
        Self {
            store,
            exchange,
            identity,
        }
    }

    /// Authorize an account from a newly supplied PIN
    ///
    /// Returns the account on success, and also on the two benign no-ops
    /// (absent PIN, unchanged PIN). Returns `Ok(None)` when authorization
    /// did not complete; the reasons are logged at warn level and are not
    /// distinguished for the caller. Database errors propagate as `Err`.
    ///
    /// Nothing is persisted until the exchanged tokens have been validated
    /// against the identity endpoint; the credential is saved before the
    /// account so the account row never points at an unsaved credential.
    pub async fn authorize_from_pin(
        &self,
        mut account: Account,
        pin: Option<&str>,
    ) -> Result<Option<Account>> {
        let pin = pin.map(str::trim).unwrap_or("");

        if pin.is_empty() {
            debug!(account = %account.guid, "PIN is empty, ignoring account authorization update");
            return Ok(Some(account));
        }

        let current = self.store.current_credential(&account).await?;

        if let Some(existing) = &current {
            if existing.code == pin {
                debug!(account = %account.guid, "PIN hasn't changed, ignoring account authorization update");
                return Ok(Some(account));
            }
        }

        // Reuse the existing credential row, or start a new one for a first
        // authorization. Nothing is persisted until validation succeeds.
        let mut credential =
            current.unwrap_or_else(|| OAuthCredential::new(account.guid.clone()));

        let grant = match self.exchange.exchange_pin(pin).await {
            Ok(grant) => grant,
            Err(err) => {
                warn!(
                    account = %account.guid,
                    error = %err,
                    "Unable to update credential, token exchange failed"
                );
                return Ok(None);
            }
        };

        credential.code = pin.to_string();
        credential.access_token = grant.access_token.clone();
        credential.refresh_token = grant.refresh_token.clone();
        credential.expires_at = grant.expires_at();
        credential.updated_at = Utc::now();

        // Validate the fresh (unsaved) credential against the identity
        // endpoint before anything is written.
        let settings = match self.identity.user_settings(&credential.access_token).await {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                warn!(account = %account.guid, "Unable to retrieve account details for authorization");
                return Ok(None);
            }
            Err(err) => {
                warn!(
                    account = %account.guid,
                    error = %err,
                    "Unable to retrieve account details for authorization"
                );
                return Ok(None);
            }
        };

        let username = match settings
            .user
            .and_then(|user| user.username)
            .filter(|username| !username.is_empty())
        {
            Some(username) => username,
            None => {
                warn!(account = %account.guid, "Unable to retrieve username for authorization");
                return Ok(None);
            }
        };

        account.username = Some(username);
        account.updated_at = Utc::now();

        // Credential first, account second.
        self.store.save_credential(&credential).await?;
        self.store.save_account(&account).await?;

        info!(
            account = %account.guid,
            username = account.username.as_deref().unwrap_or(""),
            "Updated account authorization"
        );

        Ok(Some(account))
    }
}
