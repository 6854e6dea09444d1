//! OAuth credential queries
//!
//! Credentials are ordered by creation time per account; the first row is
//! the current credential used for API authorization.

use crate::db::models::OAuthCredential;
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

type CredentialRow = (
    String,
    String,
    String,
    String,
    String,
    Option<DateTime<Utc>>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn credential_from_row(row: CredentialRow) -> OAuthCredential {
    OAuthCredential {
        guid: row.0,
        account_guid: row.1,
        code: row.2,
        access_token: row.3,
        refresh_token: row.4,
        expires_at: row.5,
        created_at: row.6,
        updated_at: row.7,
    }
}

const CREDENTIAL_COLUMNS: &str =
    "guid, account_guid, code, access_token, refresh_token, expires_at, created_at, updated_at";

/// Fetch an account's current credential (oldest row), if any
pub async fn current_credential(
    db: &SqlitePool,
    account_guid: &str,
) -> Result<Option<OAuthCredential>> {
    let query = format!(
        "SELECT {CREDENTIAL_COLUMNS} FROM oauth_credentials
         WHERE account_guid = ?
         ORDER BY created_at ASC, rowid ASC
         LIMIT 1"
    );

    let row: Option<CredentialRow> = sqlx::query_as(&query)
        .bind(account_guid)
        .fetch_optional(db)
        .await?;

    Ok(row.map(credential_from_row))
}

/// List an account's credentials in creation order (current first)
pub async fn credentials_for_account(
    db: &SqlitePool,
    account_guid: &str,
) -> Result<Vec<OAuthCredential>> {
    let query = format!(
        "SELECT {CREDENTIAL_COLUMNS} FROM oauth_credentials
         WHERE account_guid = ?
         ORDER BY created_at ASC, rowid ASC"
    );

    let rows: Vec<CredentialRow> = sqlx::query_as(&query)
        .bind(account_guid)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(credential_from_row).collect())
}

/// Persist a credential (insert, or overwrite token fields in place)
pub async fn save_credential(db: &SqlitePool, credential: &OAuthCredential) -> Result<()> {
    sqlx::query(
        "INSERT INTO oauth_credentials
             (guid, account_guid, code, access_token, refresh_token, expires_at, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(guid) DO UPDATE SET
             code = excluded.code,
             access_token = excluded.access_token,
             refresh_token = excluded.refresh_token,
             expires_at = excluded.expires_at,
             updated_at = excluded.updated_at",
    )
    .bind(&credential.guid)
    .bind(&credential.account_guid)
    .bind(&credential.code)
    .bind(&credential.access_token)
    .bind(&credential.refresh_token)
    .bind(credential.expires_at)
    .bind(credential.created_at)
    .bind(credential.updated_at)
    .execute(db)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::accounts::insert_account;
    use crate::db::init::create_schema;
    use crate::db::models::Account;

    async fn setup_test_db() -> (SqlitePool, Account) {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        create_schema(&pool).await.unwrap();

        let account = Account::new();
        insert_account(&pool, &account).await.unwrap();

        (pool, account)
    }

    #[tokio::test]
    async fn test_current_credential_none_without_rows() {
        let (pool, account) = setup_test_db().await;

        let current = current_credential(&pool, &account.guid).await.unwrap();
        assert!(current.is_none());
    }

    #[tokio::test]
    async fn test_save_and_fetch_current_credential() {
        let (pool, account) = setup_test_db().await;

        let mut credential = OAuthCredential::new(account.guid.clone());
        credential.code = "111".to_string();
        credential.access_token = "access".to_string();
        credential.refresh_token = "refresh".to_string();
        save_credential(&pool, &credential).await.unwrap();

        let current = current_credential(&pool, &account.guid).await.unwrap().unwrap();
        assert_eq!(current.guid, credential.guid);
        assert_eq!(current.code, "111");
        assert_eq!(current.access_token, "access");
    }

    #[tokio::test]
    async fn test_oldest_credential_is_current() {
        let (pool, account) = setup_test_db().await;

        let mut older = OAuthCredential::new(account.guid.clone());
        older.created_at = older.created_at - chrono::Duration::seconds(30);
        older.code = "old".to_string();

        let mut newer = OAuthCredential::new(account.guid.clone());
        newer.code = "new".to_string();

        save_credential(&pool, &newer).await.unwrap();
        save_credential(&pool, &older).await.unwrap();

        let current = current_credential(&pool, &account.guid).await.unwrap().unwrap();
        assert_eq!(current.code, "old");

        let all = credentials_for_account(&pool, &account.guid).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code, "old");
        assert_eq!(all[1].code, "new");
    }

    #[tokio::test]
    async fn test_save_credential_overwrites_in_place() {
        let (pool, account) = setup_test_db().await;

        let mut credential = OAuthCredential::new(account.guid.clone());
        credential.code = "111".to_string();
        credential.access_token = "first-access".to_string();
        save_credential(&pool, &credential).await.unwrap();

        credential.code = "222".to_string();
        credential.access_token = "second-access".to_string();
        credential.updated_at = Utc::now();
        save_credential(&pool, &credential).await.unwrap();

        let all = credentials_for_account(&pool, &account.guid).await.unwrap();
        assert_eq!(all.len(), 1, "Re-authorization overwrites, never duplicates");
        assert_eq!(all[0].code, "222");
        assert_eq!(all[0].access_token, "second-access");
    }

    #[tokio::test]
    async fn test_credentials_isolated_per_account() {
        let (pool, account) = setup_test_db().await;

        let other = Account::new();
        insert_account(&pool, &other).await.unwrap();

        let mut credential = OAuthCredential::new(account.guid.clone());
        credential.code = "111".to_string();
        save_credential(&pool, &credential).await.unwrap();

        let current = current_credential(&pool, &other.guid).await.unwrap();
        assert!(current.is_none());
    }
}
