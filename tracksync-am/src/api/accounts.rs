//! Account API endpoints
//!
//! The authorize endpoint is the glue between a user submitting a PIN and
//! the [`CredentialAuthorizer`]: it loads the account, runs the flow, and
//! maps the collapsed "did not complete" outcome to one error response.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use tracksync_common::db::accounts;
use tracksync_common::db::models::Account;

use crate::authorizer::CredentialAuthorizer;
use crate::store::SqliteAccountStore;
use crate::{ApiError, ApiResult, AppState};

/// Request payload for the authorize endpoint
#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    /// PIN from the tracker's activation page; empty or missing means
    /// "nothing to do"
    #[serde(default)]
    pub pin: Option<String>,
}

/// GET /api/accounts
pub async fn list_accounts(State(state): State<AppState>) -> ApiResult<Json<Vec<Account>>> {
    let accounts = accounts::list_accounts(&state.db).await?;
    Ok(Json(accounts))
}

/// POST /api/accounts
///
/// Register a new, not yet authorized account.
pub async fn register_account(State(state): State<AppState>) -> ApiResult<Json<Account>> {
    let account = Account::new();
    accounts::insert_account(&state.db, &account).await?;

    info!(account = %account.guid, "Registered new account");
    Ok(Json(account))
}

/// GET /api/accounts/:guid
pub async fn get_account(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<Json<Account>> {
    let account = accounts::get_account(&state.db, &guid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Account {}", guid)))?;

    Ok(Json(account))
}

/// POST /api/accounts/:guid/authorize
///
/// **Request:** `{"pin": "8A29C581"}`
///
/// Responds with the account on success and on the benign no-ops (absent or
/// unchanged PIN). All authorization failures collapse to one 502 response;
/// the distinction is only logged.
pub async fn authorize_account(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    Json(payload): Json<AuthorizeRequest>,
) -> ApiResult<Json<Account>> {
    let account = accounts::get_account(&state.db, &guid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Account {}", guid)))?;

    let store = SqliteAccountStore::new(state.db.clone());
    let authorizer = CredentialAuthorizer::new(store, state.trakt.clone(), state.trakt.clone());

    match authorizer
        .authorize_from_pin(account, payload.pin.as_deref())
        .await?
    {
        Some(account) => Ok(Json(account)),
        None => Err(ApiError::AuthorizationIncomplete(guid)),
    }
}

/// Build account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/api/accounts", get(list_accounts).post(register_account))
        .route("/api/accounts/:guid", get(get_account))
        .route("/api/accounts/:guid/authorize", post(authorize_account))
}
